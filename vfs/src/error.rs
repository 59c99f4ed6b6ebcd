use std::io;

use thiserror::Error;

/// Errors that can occur while accessing extracted assets.
#[derive(Error, Debug)]
pub enum VfsError {
    /// The resolved file could not be opened for reading.
    #[error("cannot open '{path}': {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },
    /// A write-path operation was requested on the read-only backend.
    #[error("extracted assets are read-only")]
    ReadOnly,
    /// A seek or read was attempted on a handle with no open file.
    #[error("no file is open")]
    NotOpen,
    /// The caller passed arguments that violate the operation contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The path does not name a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),
    /// The directory listing id is unknown or already closed.
    #[error("invalid directory handle: {0}")]
    InvalidHandle(u32),
    /// The underlying seek or read primitive failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type VfsResult<T> = Result<T, VfsError>;
