use std::{error::Error, sync::Arc};

/// Error returned by a factory while building a module.
///
/// The source is kept behind an [`Arc`], because a failed build is shared by every waiter of the same module.
#[derive(thiserror::Error, Debug, Clone)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Custom(Arc<dyn Error + Send + Sync + 'static>),
}

impl From<anyhow::Error> for InstantiateErrorKind {
    #[inline]
    fn from(err: anyhow::Error) -> Self {
        let err: Box<dyn Error + Send + Sync + 'static> = err.into();
        Self::Custom(Arc::from(err))
    }
}
