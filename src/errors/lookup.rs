use std::{io, path::PathBuf};

use super::RegisterErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum LookupErrorKind {
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Failed to walk lookup root: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Discovery task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Failed to read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("File {} declares module {name} which is not in the catalog", path.display())]
    UnknownModule { path: PathBuf, name: Box<str> },
    #[error("Failed to register modules of file {}: {source}", path.display())]
    Register {
        path: PathBuf,
        #[source]
        source: RegisterErrorKind,
    },
}
