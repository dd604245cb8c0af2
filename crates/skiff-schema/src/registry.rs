//! Known schema versions and their strict decoders, oldest first.
//!
//! Adding a schema version means appending one entry here and one hop to
//! [`crate::upgrade::UPGRADE_CHAIN`]. Entries are never removed.

use crate::document::{VersionedDocument, detect_api_version, strict_decode};
use crate::schema::{v1, v1alpha1, v1alpha2, v1beta1, v1beta2};
use crate::version::ApiVersion;
use crate::{Error, Result};

/// One registered schema version.
#[derive(Debug, Clone, Copy)]
pub struct SchemaVersion {
    pub version: &'static str,
    /// Strict decode of a whole document at this version.
    pub decode: fn(&[u8]) -> Result<VersionedDocument>,
}

impl SchemaVersion {
    pub fn api_version(&self) -> Result<ApiVersion> {
        ApiVersion::parse(self.version)
    }
}

static SCHEMA_VERSIONS: &[SchemaVersion] = &[
    SchemaVersion {
        version: v1alpha1::VERSION,
        decode: |bytes| strict_decode(v1alpha1::VERSION, bytes).map(VersionedDocument::V1Alpha1),
    },
    SchemaVersion {
        version: v1alpha2::VERSION,
        decode: |bytes| strict_decode(v1alpha2::VERSION, bytes).map(VersionedDocument::V1Alpha2),
    },
    SchemaVersion {
        version: v1beta1::VERSION,
        decode: |bytes| strict_decode(v1beta1::VERSION, bytes).map(VersionedDocument::V1Beta1),
    },
    SchemaVersion {
        version: v1beta2::VERSION,
        decode: |bytes| strict_decode(v1beta2::VERSION, bytes).map(VersionedDocument::V1Beta2),
    },
    SchemaVersion {
        version: v1::VERSION,
        decode: |bytes| strict_decode(v1::VERSION, bytes).map(VersionedDocument::V1),
    },
];

/// Look up a version by its exact `apiVersion` string.
pub fn find(version: &str) -> Option<&'static SchemaVersion> {
    SCHEMA_VERSIONS.iter().find(|entry| entry.version == version)
}

/// Every registered version, oldest first.
pub fn versions() -> &'static [SchemaVersion] {
    SCHEMA_VERSIONS
}

/// The newest registered version.
pub fn latest_schema() -> &'static SchemaVersion {
    &SCHEMA_VERSIONS[SCHEMA_VERSIONS.len() - 1]
}

/// Look up a version, explaining why an unregistered one is not usable.
///
/// A well-formed version newer than the latest one means this build is too
/// old; anything else is simply unknown.
pub fn lookup(version: &str) -> Result<&'static SchemaVersion> {
    if let Some(entry) = find(version) {
        return Ok(entry);
    }

    let latest = latest_schema();
    match (ApiVersion::parse(version), latest.api_version()) {
        (Ok(requested), Ok(newest)) if requested > newest => Err(Error::TooNew {
            version: version.to_string(),
            latest: latest.version.to_string(),
        }),
        _ => Err(Error::UnknownVersion {
            version: version.to_string(),
        }),
    }
}

/// Detect the version of a document and strict-decode it at that version.
pub fn decode(bytes: &[u8]) -> Result<VersionedDocument> {
    let version = detect_api_version(bytes)?;
    let entry = lookup(&version)?;
    tracing::debug!(version = entry.version, "Decoding config");
    (entry.decode)(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LATEST_VERSION;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_versions_are_strictly_ascending() {
        let parsed: Vec<ApiVersion> = versions()
            .iter()
            .map(|entry| entry.api_version().unwrap())
            .collect();

        assert!(parsed.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_latest_is_last_entry() {
        assert_eq!(latest_schema().version, LATEST_VERSION);
    }

    #[test]
    fn test_find_exact_version_only() {
        assert_eq!(find("skiff/v1beta1").unwrap().version, "skiff/v1beta1");
        assert!(find("skiff/v1beta3").is_none());
        assert!(find("skiff/V1").is_none());
    }

    #[test]
    fn test_newer_version_asks_for_upgrade() {
        assert!(matches!(lookup("skiff/v2alpha1"), Err(Error::TooNew { .. })));
        assert!(matches!(lookup("skiff/v3"), Err(Error::TooNew { .. })));
    }

    #[test]
    fn test_unregistered_older_or_malformed_version_is_unknown() {
        assert!(matches!(lookup("skiff/v1alpha7"), Err(Error::UnknownVersion { .. })));
        assert!(matches!(lookup("other/v1"), Err(Error::UnknownVersion { .. })));
    }

    #[test]
    fn test_decode_picks_entry_from_document() {
        let document = decode(b"apiVersion: skiff/v1alpha2\nkind: Config\n").unwrap();
        assert_eq!(document.api_version(), "skiff/v1alpha2");
    }

    #[test]
    fn test_decoder_produces_matching_variant() {
        for entry in versions() {
            let yaml = format!("apiVersion: {}\n", entry.version);
            let document = (entry.decode)(yaml.as_bytes()).unwrap();
            assert_eq!(document.api_version(), entry.version);
        }
    }
}
