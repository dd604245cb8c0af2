//! Error types for skiff-core

use std::sync::Arc;

/// Result type for skiff-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The primary config is older than the latest schema and was not upgraded
    #[error(
        "Config {location} is at {version}, but the latest version is {latest}; \
         run `skiff fix` to upgrade it"
    )]
    OutOfDate {
        location: String,
        version: String,
        latest: String,
    },

    /// A requested profile is not defined in the config
    #[error("Couldn't find profile {name}")]
    ProfileNotFound { name: String },

    /// No home directory to place the global config in
    #[error("Unable to determine the home directory for the global config")]
    NoHomeDir,

    /// Failure shared by every caller of a run-once cache
    #[error(transparent)]
    Cached(Arc<Error>),

    // Transparent wrappers for underlying crate errors
    /// Filesystem or fetch error from skiff-fs
    #[error(transparent)]
    Fs(#[from] skiff_fs::Error),

    /// Decode, validation, or upgrade error from skiff-schema
    #[error(transparent)]
    Schema(#[from] skiff_schema::Error),

    /// JSON conversion error while merging layers
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
