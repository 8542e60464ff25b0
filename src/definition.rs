use core::{fmt, future::Future};
use std::sync::Arc;

use crate::{
    errors::InstantiateErrorKind,
    instantiator::{async_factory_fn, factory_fn, Arguments, BoxedFactory, Factory},
};

/// A part of a [`Definition`]: either a dependency name or the factory
#[derive(Clone)]
pub enum Part {
    Dependency(Box<str>),
    Factory(BoxedFactory),
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependency(name) => f.debug_tuple("Dependency").field(name).finish(),
            Self::Factory(_) => f.write_str("Factory"),
        }
    }
}

impl From<&str> for Part {
    #[inline]
    fn from(name: &str) -> Self {
        Self::Dependency(name.into())
    }
}

impl From<String> for Part {
    #[inline]
    fn from(name: String) -> Self {
        Self::Dependency(name.into_boxed_str())
    }
}

impl From<BoxedFactory> for Part {
    #[inline]
    fn from(factory: BoxedFactory) -> Self {
        Self::Factory(factory)
    }
}

/// Ordered dependency names with a trailing factory.
///
/// The factory is called with the resolved dependencies in the same order as they are declared here.
/// Definitions built with [`Definition::from_parts`] are validated only when registered or injected.
#[derive(Clone, Debug)]
pub struct Definition {
    parts: Vec<Part>,
}

impl Definition {
    /// Creates definition with a synchronous factory
    #[must_use]
    pub fn new<I, S, F, T, Err>(dependencies: I, factory: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
        F: Fn(Arguments) -> Result<T, Err> + Send + Sync + 'static,
        T: Send + Sync + 'static,
        Err: Into<InstantiateErrorKind>,
    {
        Self::with_factory(dependencies, factory_fn(factory))
    }

    /// Creates definition with a factory returning a future
    #[must_use]
    pub fn new_async<I, S, F, Fut, T, Err>(dependencies: I, factory: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, Err>> + Send + 'static,
        T: Send + Sync + 'static,
        Err: Into<InstantiateErrorKind>,
    {
        Self::with_factory(dependencies, async_factory_fn(factory))
    }

    /// Creates definition without dependencies
    #[inline]
    #[must_use]
    pub fn from_fn<F, T, Err>(factory: F) -> Self
    where
        F: Fn(Arguments) -> Result<T, Err> + Send + Sync + 'static,
        T: Send + Sync + 'static,
        Err: Into<InstantiateErrorKind>,
    {
        Self::new(core::iter::empty::<Box<str>>(), factory)
    }

    #[must_use]
    pub fn with_factory<I, S>(dependencies: I, factory: impl Factory) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        let mut parts: Vec<Part> = dependencies.into_iter().map(|name| Part::Dependency(name.into())).collect();
        parts.push(Part::Factory(Arc::new(factory)));
        Self { parts }
    }

    /// Creates definition from raw parts, where the last part is expected to be the factory
    #[inline]
    #[must_use]
    pub fn from_parts(parts: impl IntoIterator<Item = Part>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
        }
    }

    /// Splits definition into dependency names and the factory.
    /// Returns `None` if the last part isn't a factory or a factory is found before it.
    pub(crate) fn split(self) -> Option<(Box<[Box<str>]>, BoxedFactory)> {
        let mut parts = self.parts;
        let Some(Part::Factory(factory)) = parts.pop() else {
            return None;
        };

        let mut dependencies = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Part::Dependency(name) => dependencies.push(name),
                Part::Factory(_) => return None,
            }
        }
        Some((dependencies.into_boxed_slice(), factory))
    }
}
