use anyhow::anyhow;
use core::future::Future;
use futures_util::future::{self, BoxFuture, FutureExt as _};
use std::sync::Arc;

use crate::{
    any::{downcast, value, Value},
    errors::InstantiateErrorKind,
};

/// Resolved dependencies of a module, passed positionally to its factory.
///
/// The order of values matches the declared order of dependency names.
/// Context is only set for ad-hoc injections with a caller-supplied context.
pub struct Arguments {
    values: Box<[Value]>,
    context: Option<Value>,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub(crate) fn new(values: Vec<Value>, context: Option<Value>) -> Self {
        Self {
            values: values.into_boxed_slice(),
            context,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Gets the dependency at `index` downcasted to `T`
    ///
    /// # Errors
    /// Returns an error if there is no argument at `index` or it isn't a `T`
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, InstantiateErrorKind> {
        let Some(val) = self.values.get(index) else {
            return Err(anyhow!("Argument {index} not found, arguments count is {}", self.values.len()).into());
        };
        downcast(val).map_err(|expected| anyhow!("Argument {index} has incorrect type, expected: {expected}").into())
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    #[must_use]
    pub fn context_as<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.context.as_ref().and_then(|context| downcast(context).ok())
    }
}

/// Builds the exported value of a module from its resolved dependencies.
///
/// Usually created with [`factory_fn`] or [`async_factory_fn`].
pub trait Factory: Send + Sync + 'static {
    fn instantiate(&self, arguments: Arguments) -> BoxFuture<'static, Result<Value, InstantiateErrorKind>>;
}

pub type BoxedFactory = Arc<dyn Factory>;

#[derive(Clone, Copy)]
pub struct FactoryFn<F> {
    f: F,
}

#[derive(Clone, Copy)]
pub struct AsyncFactoryFn<F> {
    f: F,
}

/// Creates a factory from a synchronous closure.
/// The returned value is wrapped into a [`Value`].
#[inline]
#[must_use]
pub fn factory_fn<F, T, Err>(f: F) -> FactoryFn<F>
where
    F: Fn(Arguments) -> Result<T, Err> + Send + Sync + 'static,
    T: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    FactoryFn { f }
}

/// Creates a factory from a closure returning a future.
/// The output of the future is wrapped into a [`Value`].
#[inline]
#[must_use]
pub fn async_factory_fn<F, Fut, T, Err>(f: F) -> AsyncFactoryFn<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, Err>> + Send + 'static,
    T: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    AsyncFactoryFn { f }
}

impl<F, T, Err> Factory for FactoryFn<F>
where
    F: Fn(Arguments) -> Result<T, Err> + Send + Sync + 'static,
    T: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    fn instantiate(&self, arguments: Arguments) -> BoxFuture<'static, Result<Value, InstantiateErrorKind>> {
        future::ready((self.f)(arguments).map(value).map_err(Into::into)).boxed()
    }
}

impl<F, Fut, T, Err> Factory for AsyncFactoryFn<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, Err>> + Send + 'static,
    T: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    fn instantiate(&self, arguments: Arguments) -> BoxFuture<'static, Result<Value, InstantiateErrorKind>> {
        (self.f)(arguments)
            .map(|result| result.map(value).map_err(Into::into))
            .boxed()
    }
}

/// Factory returning the same value on every call, used for constants
pub(crate) struct ConstantFactory {
    value: Value,
}

impl ConstantFactory {
    #[inline]
    #[must_use]
    pub(crate) fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Factory for ConstantFactory {
    fn instantiate(&self, _arguments: Arguments) -> BoxFuture<'static, Result<Value, InstantiateErrorKind>> {
        future::ready(Ok(self.value.clone())).boxed()
    }
}
