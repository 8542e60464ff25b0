//! Static auto-registration of modules.
//!
//! Module descriptors are collected at link time into [`MODULES`] with [`auto_module!`](crate::auto_module)
//! and registered into an explicit container with [`Container::provide_auto_modules`].

use tracing::debug;

use crate::{container::Container, errors::RegisterErrorKind, module::ModuleDescriptor};

pub use linkme::{self, distributed_slice};

#[distributed_slice]
pub static MODULES: [fn() -> ModuleDescriptor];

/// Adds a module descriptor getter to [`MODULES`]
///
/// ```ignore
/// lazuli::auto_module!(LOGGER, || ModuleDescriptor::new("logger", Definition::from_fn(|_| Ok::<_, InstantiateErrorKind>(Logger))));
/// ```
#[macro_export]
macro_rules! auto_module {
    ($ident:ident, $getter:expr $(,)?) => {
        #[$crate::auto::distributed_slice($crate::auto::MODULES)]
        #[linkme(crate = $crate::auto::linkme)]
        static $ident: fn() -> $crate::ModuleDescriptor = $getter;
    };
}

impl Container {
    /// Registers every module from [`MODULES`] and returns their count.
    /// Registration stops at the first failure, modules registered before it are kept.
    ///
    /// # Errors
    /// Returns errors of [`Container::register`]
    pub fn provide_auto_modules(&self) -> Result<usize, RegisterErrorKind> {
        for getter in MODULES {
            let ModuleDescriptor { name, definition } = getter();
            self.register(name, definition)?;
        }

        debug!(count = MODULES.len(), "Auto modules registered");
        Ok(MODULES.len())
    }
}
