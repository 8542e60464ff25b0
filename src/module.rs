use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;

use crate::{any::Value, definition::Definition, errors::ResolveErrorKind, instantiator::BoxedFactory};

pub(crate) type SharedResolution = Shared<BoxFuture<'static, Result<Value, ResolveErrorKind>>>;

pub(crate) enum State {
    Unresolved,
    /// Build in flight. The handle is shared by every requester and kept after a failure.
    Resolving(SharedResolution),
    Resolved(Value),
}

/// Resolution state of a registered module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Unresolved,
    Resolving,
    Resolved,
}

impl From<&State> for ModuleState {
    #[inline]
    fn from(state: &State) -> Self {
        match state {
            State::Unresolved => Self::Unresolved,
            State::Resolving(_) => Self::Resolving,
            State::Resolved(_) => Self::Resolved,
        }
    }
}

pub(crate) struct Module {
    pub(crate) name: Box<str>,
    pub(crate) dependencies: Box<[Box<str>]>,
    pub(crate) factory: BoxedFactory,
    pub(crate) state: Mutex<State>,
}

impl Module {
    #[inline]
    #[must_use]
    pub(crate) fn new(name: Box<str>, dependencies: Box<[Box<str>]>, factory: BoxedFactory) -> Self {
        Self {
            name,
            dependencies,
            factory,
            state: Mutex::new(State::Unresolved),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn new_resolved(name: Box<str>, factory: BoxedFactory, value: Value) -> Self {
        Self {
            name,
            dependencies: Box::default(),
            factory,
            state: Mutex::new(State::Resolved(value)),
        }
    }

    /// Stores the exported value. The value is never replaced once set.
    pub(crate) fn complete(&self, value: &Value) {
        let mut state = self.state.lock();
        if !matches!(*state, State::Resolved(_)) {
            *state = State::Resolved(value.clone());
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn module_state(&self) -> ModuleState {
        ModuleState::from(&*self.state.lock())
    }
}

/// A module found by discovery or static auto-registration
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub name: Box<str>,
    pub definition: Definition,
}

impl ModuleDescriptor {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Box<str>>, definition: Definition) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Module, ModuleState, State};
    use crate::{any::value, instantiator::ConstantFactory};

    use std::sync::Arc;

    #[test]
    fn test_complete_once() {
        let first = value(1_u8);
        let module = Module::new("a".into(), Box::default(), Arc::new(ConstantFactory::new(first.clone())));
        assert_eq!(module.module_state(), ModuleState::Unresolved);

        module.complete(&first);
        module.complete(&value(2_u8));
        assert_eq!(module.module_state(), ModuleState::Resolved);

        let State::Resolved(stored) = &*module.state.lock() else {
            panic!("module should be resolved");
        };
        assert!(Arc::ptr_eq(stored, &first));
    }
}
