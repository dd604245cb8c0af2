//! Error types for skiff-schema

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config is missing the apiVersion field")]
    MissingApiVersion,

    #[error("Failed to decode {stage}: {message}")]
    Decode { stage: &'static str, message: String },

    #[error("Unknown field `{path}` in {version} config")]
    UnknownField { version: String, path: String },

    #[error("Unknown api version: {version}")]
    UnknownVersion { version: String },

    #[error("Invalid api version `{version}`: {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error(
        "Config version {version} is too new for this build \
         (latest supported is {latest}); upgrade skiff"
    )]
    TooNew { version: String, latest: String },

    #[error("Required value not set: {field} (in {type_name})")]
    Required {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("Only one of {fields:?} may be set (in {type_name}, group {set})")]
    OneOf {
        type_name: &'static str,
        set: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("Cannot upgrade {field}: {reason}")]
    Incompatible { field: String, reason: String },

    #[error("Failed to upgrade config from {from} to {to}: {message}")]
    Upgrade {
        from: &'static str,
        to: &'static str,
        message: String,
    },

    #[error("No upgrade path from {version}")]
    NoUpgradePath { version: String },

    #[error("Upgrade step for {expected} received a {found} document")]
    VersionMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to encode config: {0}")]
    Encode(String),
}
