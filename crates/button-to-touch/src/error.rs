//! Error types for configuration loading and host interaction

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`Host`](crate::host::Host) implementation
#[derive(Error, Debug)]
pub enum HostError {
    /// Device parameters cannot be passed across the C ABI
    #[error("device parameters contain an interior NUL byte")]
    InteriorNul(#[from] std::ffi::NulError),

    /// Host did not provide the required function table
    #[error("host passed a null required-function table")]
    MissingFunctionTable,

    /// Host left a required function unresolved
    #[error("host did not resolve required function {0}")]
    MissingFunction(&'static str),

    /// Host returned a null device handle
    #[error("host returned a null button device for params {params:?}")]
    NullDevice { params: String },
}

/// Errors from loading the button-to-touch configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The directory of the running executable could not be determined
    #[error("failed to locate executable directory: {0}")]
    ExecutableDir(#[source] std::io::Error),

    /// The file was opened but could not be read
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a JSON array of `{ params, x, y }` objects
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry's `params` string contains a NUL byte
    #[error("entry {index}: params contain an interior NUL byte")]
    InvalidParams { index: usize },

    /// The host failed to create a button device
    #[error("entry {index}: {source}")]
    Device {
        index: usize,
        #[source]
        source: HostError,
    },
}
