//! Error taxonomy shared by every stage of a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure a run can end in. None of them are recoverable: the caller
/// reports the message and exits without touching the target file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Path is empty or has no key")]
    EmptyPath,

    #[error("Path not found: {path} ({segment})")]
    PathNotFound { path: String, segment: String },

    #[error("Path runs into non-object: {path} ({segment})")]
    NotAnObject { path: String, segment: String },

    #[error("Key not found: {path} ({key})")]
    KeyNotFound { path: String, key: String },

    #[error("Key already exists: {path} ({key})")]
    KeyAlreadyExists { path: String, key: String },

    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid JSON value: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Unsupported data type: {0}")]
    UnsupportedType(String),

    #[error("Failed to read file: {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse JSON file: {}: {source}", path.display())]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write file: {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Process exit status for this error. Usage problems are 2, anything
    /// failing before the document is in memory is 3, traversal and coercion
    /// failures are 4 and write failures are 5.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            Error::FileRead { .. } | Error::JsonParse { .. } => 3,
            Error::FileWrite { .. } => 5,
            Error::EmptyPath
            | Error::PathNotFound { .. }
            | Error::NotAnObject { .. }
            | Error::KeyNotFound { .. }
            | Error::KeyAlreadyExists { .. }
            | Error::InvalidNumber(_)
            | Error::InvalidJson(_)
            | Error::UnsupportedType(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
