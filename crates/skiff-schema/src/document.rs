//! A pipeline document at one concrete schema version.

use crate::schema::{latest, v1alpha1, v1alpha2, v1beta1, v1beta2};
use crate::validation::validate;
use crate::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq)]
pub enum VersionedDocument {
    V1Alpha1(v1alpha1::Config),
    V1Alpha2(v1alpha2::Config),
    V1Beta1(v1beta1::Config),
    V1Beta2(v1beta2::Config),
    V1(latest::Config),
}

impl VersionedDocument {
    /// The schema version this document is shaped by.
    ///
    /// This is the version of the variant, not the raw `apiVersion` string
    /// inside the document.
    pub fn api_version(&self) -> &'static str {
        match self {
            Self::V1Alpha1(_) => v1alpha1::VERSION,
            Self::V1Alpha2(_) => v1alpha2::VERSION,
            Self::V1Beta1(_) => v1beta1::VERSION,
            Self::V1Beta2(_) => v1beta2::VERSION,
            Self::V1(_) => latest::VERSION,
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::V1(_))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::V1Alpha1(config) => validate(config),
            Self::V1Alpha2(config) => validate(config),
            Self::V1Beta1(config) => validate(config),
            Self::V1Beta2(config) => validate(config),
            Self::V1(config) => validate(config),
        }
    }

    pub fn as_latest(&self) -> Option<&latest::Config> {
        match self {
            Self::V1(config) => Some(config),
            _ => None,
        }
    }

    /// Unwrap a latest-version document, or hand the document back.
    pub fn into_latest(self) -> std::result::Result<latest::Config, Self> {
        match self {
            Self::V1(config) => Ok(config),
            other => Err(other),
        }
    }

    /// Encode as YAML, omitting empty fields.
    pub fn to_yaml(&self) -> Result<String> {
        let encoded = match self {
            Self::V1Alpha1(config) => serde_yaml::to_string(config),
            Self::V1Alpha2(config) => serde_yaml::to_string(config),
            Self::V1Beta1(config) => serde_yaml::to_string(config),
            Self::V1Beta2(config) => serde_yaml::to_string(config),
            Self::V1(config) => serde_yaml::to_string(config),
        };
        encoded.map_err(|e| Error::Encode(e.to_string()))
    }
}

impl From<latest::Config> for VersionedDocument {
    fn from(config: latest::Config) -> Self {
        Self::V1(config)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionProbe {
    #[serde(default)]
    api_version: Option<String>,
}

/// Read only the top-level `apiVersion` of a document.
pub fn detect_api_version(bytes: &[u8]) -> Result<String> {
    let probe: VersionProbe = serde_yaml::from_slice(bytes).map_err(|e| Error::Decode {
        stage: "apiVersion",
        message: e.to_string(),
    })?;

    match probe.api_version {
        Some(version) if !version.is_empty() => Ok(version),
        _ => Err(Error::MissingApiVersion),
    }
}

/// Decode `bytes` into `T`, rejecting any field `T` does not declare.
///
/// The error names the dotted path of the first unknown field.
pub(crate) fn strict_decode<T: DeserializeOwned>(version: &str, bytes: &[u8]) -> Result<T> {
    let mut unknown = Vec::new();
    let value: T = serde_ignored::deserialize(serde_yaml::Deserializer::from_slice(bytes), |path| {
        unknown.push(dotted(&path.to_string()))
    })
    .map_err(|e| Error::Decode {
        stage: "config",
        message: e.to_string(),
    })?;

    match unknown.into_iter().next() {
        Some(path) => Err(Error::UnknownField {
            version: version.to_string(),
            path,
        }),
        None => Ok(value),
    }
}

// Optional fields show up as `?` segments.
fn dotted(path: &str) -> String {
    path.split('.')
        .filter(|segment| *segment != "?")
        .collect::<Vec<_>>()
        .join(".")
}
