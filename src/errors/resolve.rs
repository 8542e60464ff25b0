use super::InstantiateErrorKind;

#[derive(thiserror::Error, Debug, Clone)]
pub enum ResolveErrorKind {
    #[error("Missing module {name}")]
    MissingModule { name: Box<str> },
    #[error("Module {name} missing dependencies: {}", missing.join(","))]
    MissingDependencies { name: Box<str>, missing: Box<[Box<str>]> },
    #[error("Module has cycle dependencies: {}", path.join(" -> "))]
    CyclicDependency { path: Box<[Box<str>]> },
    #[error("Injected definition factory is not the trailing part of its definition")]
    InvalidFactory,
    #[error("Incorrect type of module {name}. Expected: {expected}")]
    IncorrectType { name: Box<str>, expected: &'static str },
    #[error("Container dropped while module {name} was resolving")]
    ContainerDropped { name: Box<str> },
    #[error("Module {name} factory failed: {source}")]
    Instantiate {
        name: Box<str>,
        #[source]
        source: InstantiateErrorKind,
    },
}
