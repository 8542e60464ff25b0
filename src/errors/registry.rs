#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterErrorKind {
    #[error("Module {name} already registered")]
    AlreadyRegistered { name: Box<str> },
    #[error("Module {name} factory is not the trailing part of its definition")]
    InvalidFactory { name: Box<str> },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoveErrorKind {
    #[error("Module {name} not exists")]
    NotFound { name: Box<str> },
}
