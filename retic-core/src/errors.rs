use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("table file missing: {0}")]
    TableMissing(String),
    #[error("read failure: {0}")]
    PersistenceRead(String),
    #[error("write failure: {0}")]
    PersistenceWrite(String),
}

/// Why the preferred (shared) location was not used.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PathUnavailable {
    #[error("no shared location configured")]
    NotConfigured,
    #[error("shared folder {} does not exist or is not reachable", .0.display())]
    DirectoryMissing(PathBuf),
    #[error("no write permission on shared folder {}", .0.display())]
    NotWritable(PathBuf),
    #[error("could not probe shared folder {}: {detail}", .dir.display())]
    ProbeFailed { dir: PathBuf, detail: String },
}
