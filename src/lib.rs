//! A lazy, name-keyed async dependency registry.
//!
//! Modules are registered under a name together with the names of the modules they depend on.
//! Resolving a name builds the module and everything it transitively depends on, exactly once,
//! and shares the result with every consumer.
//!
//! ```
//! use lazuli::{Container, Definition, InstantiateErrorKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let container = Container::new();
//! container.register("a", Definition::from_fn(|_| Ok::<_, InstantiateErrorKind>(1_i32)))?;
//! container.register("b", Definition::new(["a"], |args| Ok::<_, InstantiateErrorKind>(*args.get::<i32>(0)? + 1)))?;
//!
//! assert_eq!(*container.resolve_as::<i32>("b").await?, 2);
//! # Ok(())
//! # }
//! ```

pub(crate) mod any;
pub(crate) mod container;
pub(crate) mod cycle;
pub(crate) mod definition;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod module;

#[cfg(feature = "auto")]
pub mod auto;

#[cfg(feature = "lookup")]
pub mod lookup;

pub use any::{value, Value};
pub use container::{Container, Resolution};
pub use definition::{Definition, Part};
pub use errors::{InstantiateErrorKind, RegisterErrorKind, RemoveErrorKind, ResolveErrorKind};
pub use instantiator::{async_factory_fn, factory_fn, Arguments, BoxedFactory, Factory};
pub use module::{ModuleDescriptor, ModuleState};

#[cfg(feature = "lookup")]
pub use errors::LookupErrorKind;
