mod instantiate;
mod registry;
mod resolve;

#[cfg(feature = "lookup")]
mod lookup;

pub use instantiate::InstantiateErrorKind;
pub use registry::{RegisterErrorKind, RemoveErrorKind};
pub use resolve::ResolveErrorKind;

#[cfg(feature = "lookup")]
pub use lookup::LookupErrorKind;
