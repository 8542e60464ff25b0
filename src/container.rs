use core::{fmt, future::Future};
use futures_util::future::{self, try_join_all, BoxFuture, FutureExt as _};
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    sync::{Arc, Weak},
};
use tracing::{debug, debug_span, error, Instrument as _};

use crate::{
    any::{downcast, value, Value},
    cycle::detect_cycle,
    definition::Definition,
    errors::{RegisterErrorKind, RemoveErrorKind, ResolveErrorKind},
    instantiator::{Arguments, ConstantFactory},
    module::{Module, ModuleState, State},
};

/// Future of a module's exported value
pub type Resolution = BoxFuture<'static, Result<Value, ResolveErrorKind>>;

const INJECTED: &str = "<injected>";

/// Registry of named modules.
///
/// Cloning is cheap, clones share the same modules.
#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

#[derive(Default)]
struct ContainerInner {
    modules: Mutex<BTreeMap<Box<str>, Arc<Module>>>,
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module under `name`.
    ///
    /// # Errors
    /// - Returns [`RegisterErrorKind::AlreadyRegistered`] if `name` is taken, the existing module stays untouched
    /// - Returns [`RegisterErrorKind::InvalidFactory`] if the definition doesn't end with a factory
    pub fn register(&self, name: impl Into<Box<str>>, definition: Definition) -> Result<(), RegisterErrorKind> {
        let name = name.into();

        let mut modules = self.inner.modules.lock();
        if modules.contains_key(&name) {
            let err = RegisterErrorKind::AlreadyRegistered { name };
            error!("{}", err);
            return Err(err);
        }
        let Some((dependencies, factory)) = definition.split() else {
            let err = RegisterErrorKind::InvalidFactory { name };
            error!("{}", err);
            return Err(err);
        };

        debug!(module = &*name, ?dependencies, "Registered");
        modules.insert(name.clone(), Arc::new(Module::new(name, dependencies, factory)));
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.inner.modules.lock().contains_key(name)
    }

    /// Removes a module regardless of its state.
    ///
    /// # Warning
    /// Modules depending on the removed one are not checked,
    /// resolving them later fails with [`ResolveErrorKind::MissingDependencies`].
    ///
    /// # Errors
    /// Returns [`RemoveErrorKind::NotFound`] if there is no module with `name`
    pub fn remove(&self, name: &str) -> Result<(), RemoveErrorKind> {
        if self.inner.modules.lock().remove(name).is_none() {
            let err = RemoveErrorKind::NotFound { name: name.into() };
            error!("{}", err);
            return Err(err);
        }
        debug!(module = name, "Removed");
        Ok(())
    }

    /// Registers a module without dependencies exporting `val` and resolves it
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::AlreadyRegistered`] if `name` is taken
    #[inline]
    pub fn add<T: Send + Sync + 'static>(&self, name: impl Into<Box<str>>, val: T) -> Result<Resolution, RegisterErrorKind> {
        self.add_value(name, value(val))
    }

    /// Same as [`Container::add`], but for already erased values.
    /// The exported value is `val` itself, not a wrapper around it.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::AlreadyRegistered`] if `name` is taken
    pub fn add_value(&self, name: impl Into<Box<str>>, val: Value) -> Result<Resolution, RegisterErrorKind> {
        let name = name.into();

        let mut modules = self.inner.modules.lock();
        if modules.contains_key(&name) {
            let err = RegisterErrorKind::AlreadyRegistered { name };
            error!("{}", err);
            return Err(err);
        }
        debug!(module = &*name, "Registered as resolved");
        modules.insert(
            name.clone(),
            Arc::new(Module::new_resolved(name.clone(), Arc::new(ConstantFactory::new(val.clone())), val)),
        );
        drop(modules);

        Ok(self.resolve(&name))
    }

    /// Resolves the exported value of the module.
    ///
    /// The module and its unresolved dependencies are built at most once.
    /// Concurrent calls for a module being built share the same in-flight future.
    ///
    /// # Notes
    /// Construction is attempted once. If it fails, the module keeps the failed future
    /// and every later call gets the same error.
    #[inline]
    pub fn resolve(&self, name: &str) -> Resolution {
        self.resolve_inner(name, true)
    }

    /// Dependencies resolved from a build skip cycle detection,
    /// the whole graph under the top-level module was checked before its build started.
    fn resolve_inner(&self, name: &str, detect_cycles: bool) -> Resolution {
        let span = debug_span!("resolve", module = name);
        let _guard = span.enter();

        let modules = self.inner.modules.lock();
        let Some(module) = modules.get(name).cloned() else {
            let err = ResolveErrorKind::MissingModule { name: name.into() };
            error!("{}", err);
            return future::ready(Err(err)).boxed();
        };

        let mut state = module.state.lock();
        match &*state {
            State::Resolved(value) => {
                debug!("Found in cache");
                return future::ready(Ok(value.clone())).boxed();
            }
            State::Resolving(resolution) => {
                debug!("Joined in-flight resolution");
                return resolution.clone().boxed();
            }
            State::Unresolved => {}
        }

        let missing: Box<[Box<str>]> = module
            .dependencies
            .iter()
            .filter(|dependency| !modules.contains_key(&***dependency))
            .cloned()
            .collect();
        if !missing.is_empty() {
            let err = ResolveErrorKind::MissingDependencies {
                name: module.name.clone(),
                missing,
            };
            error!("{}", err);
            return future::ready(Err(err)).boxed();
        }

        if detect_cycles {
            let mut path = vec![module.name.clone()];
            if detect_cycle(&modules, &mut path) {
                let err = ResolveErrorKind::CyclicDependency {
                    path: path.into_boxed_slice(),
                };
                error!("{}", err);
                return future::ready(Err(err)).boxed();
            }
        }

        let resolution = build(Arc::downgrade(&self.inner), &module)
            .instrument(debug_span!("build", module = name))
            .boxed()
            .shared();
        *state = State::Resolving(resolution.clone());
        drop(state);
        drop(modules);

        debug!("Resolving");
        resolution.boxed()
    }

    /// Resolves the module and downcasts its exported value to `T`
    ///
    /// # Errors
    /// - Returns errors of [`Container::resolve`]
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the exported value isn't a `T`
    pub async fn resolve_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, ResolveErrorKind> {
        let value = self.resolve(name).await?;
        downcast(&value).map_err(|expected| {
            let err = ResolveErrorKind::IncorrectType { name: name.into(), expected };
            error!("{}", err);
            err
        })
    }

    /// Calls the factory of `definition` with its resolved dependencies without registering it.
    ///
    /// Nothing is cached, every call invokes the factory again.
    /// `context` is available to the factory through [`Arguments::context`].
    pub fn inject(&self, definition: Definition, context: Option<Value>) -> Resolution {
        let Some((dependencies, factory)) = definition.split() else {
            let err = ResolveErrorKind::InvalidFactory;
            error!("{}", err);
            return future::ready(Err(err)).boxed();
        };

        let container = self.clone();
        async move {
            let values = try_join_all(dependencies.iter().map(|dependency| container.resolve(dependency))).await?;
            let value = factory.instantiate(Arguments::new(values, context)).await.map_err(|source| {
                let err = ResolveErrorKind::Instantiate {
                    name: INJECTED.into(),
                    source,
                };
                error!("{}", err);
                err
            })?;

            debug!("Injected");
            Ok(value)
        }
        .instrument(debug_span!("inject"))
        .boxed()
    }

    /// Names of registered modules in ascending order
    #[must_use]
    pub fn names(&self) -> Vec<Box<str>> {
        self.inner.modules.lock().keys().cloned().collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.modules.lock().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.modules.lock().is_empty()
    }

    /// Resolution state of the module, `None` if it isn't registered
    #[must_use]
    pub fn state(&self, name: &str) -> Option<ModuleState> {
        let module = self.inner.modules.lock().get(name).cloned()?;
        Some(module.module_state())
    }
}

/// Future building `module`.
///
/// The future is stored in the module's state, so it only keeps weak handles to the container and the module.
/// Strong ones would keep both alive while the build is unfinished.
fn build(inner: Weak<ContainerInner>, module: &Arc<Module>) -> impl Future<Output = Result<Value, ResolveErrorKind>> + Send + 'static {
    let name = module.name.clone();
    let dependencies = module.dependencies.clone();
    let factory = module.factory.clone();
    let module = Arc::downgrade(module);

    async move {
        let Some(inner) = inner.upgrade() else {
            let err = ResolveErrorKind::ContainerDropped { name };
            error!("{}", err);
            return Err(err);
        };
        let container = Container { inner };
        let resolutions = dependencies
            .iter()
            .map(|dependency| container.resolve_inner(dependency, false))
            .collect::<Vec<_>>();
        drop(container);

        let values = try_join_all(resolutions).await?;
        debug!("Dependencies resolved");

        let value = factory.instantiate(Arguments::new(values, None)).await.map_err(|source| {
            let err = ResolveErrorKind::Instantiate { name, source };
            error!("{}", err);
            err
        })?;
        if let Some(module) = module.upgrade() {
            module.complete(&value);
        }

        debug!("Resolved");
        Ok(value)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container").field("modules", &self.names()).finish()
    }
}
