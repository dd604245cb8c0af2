//! Driving a document forward through the schema version chain.
//!
//! Each [`Hop`] moves a document from one version to the one immediately
//! after it. Hops read the old document and build a new one; they never
//! modify their input and never return a half-upgraded document.

use crate::LATEST_VERSION;
use crate::document::VersionedDocument;
use crate::schema::{v1, v1alpha1, v1alpha2, v1beta1, v1beta2};
use crate::version::ApiVersion;
use crate::{Error, Result};

/// One step of the chain.
#[derive(Debug, Clone, Copy)]
pub struct Hop {
    pub from: &'static str,
    pub to: &'static str,
    pub apply: fn(&VersionedDocument) -> Result<VersionedDocument>,
}

/// Record of a hop that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedHop {
    pub from: &'static str,
    pub to: &'static str,
}

/// An upgraded document and the hops taken to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgraded {
    pub document: VersionedDocument,
    pub hops: Vec<AppliedHop>,
}

macro_rules! hop {
    ($from:ident :: $variant:ident => $to:ident :: $next:ident) => {
        Hop {
            from: $from::VERSION,
            to: $to::VERSION,
            apply: |document| match document {
                VersionedDocument::$variant(config) => {
                    $from::upgrade(config).map(VersionedDocument::$next)
                }
                other => Err(Error::VersionMismatch {
                    expected: $from::VERSION,
                    found: other.api_version(),
                }),
            },
        }
    };
}

/// Every hop, oldest first. Consecutive entries share a version.
pub static UPGRADE_CHAIN: &[Hop] = &[
    hop!(v1alpha1::V1Alpha1 => v1alpha2::V1Alpha2),
    hop!(v1alpha2::V1Alpha2 => v1beta1::V1Beta1),
    hop!(v1beta1::V1Beta1 => v1beta2::V1Beta2),
    hop!(v1beta2::V1Beta2 => v1::V1),
];

/// Upgrade a document to [`LATEST_VERSION`].
pub fn upgrade_to_latest(document: VersionedDocument) -> Result<Upgraded> {
    upgrade_with(UPGRADE_CHAIN, LATEST_VERSION, document)
}

/// Upgrade a document to `target` using `chain`.
///
/// A document already at `target` is returned untouched with no hops. A
/// document newer than `target` is rejected before any hop runs.
pub fn upgrade_with(
    chain: &[Hop],
    target: &str,
    document: VersionedDocument,
) -> Result<Upgraded> {
    let current = ApiVersion::parse(document.api_version())?;
    let wanted = ApiVersion::parse(target)?;
    if current > wanted {
        return Err(Error::TooNew {
            version: document.api_version().to_string(),
            latest: target.to_string(),
        });
    }

    let mut document = document;
    let mut hops = Vec::new();

    while document.api_version() != target {
        let version = document.api_version();
        let hop = chain
            .iter()
            .find(|hop| hop.from == version)
            .ok_or_else(|| Error::NoUpgradePath {
                version: version.to_string(),
            })?;

        tracing::debug!(from = hop.from, to = hop.to, "Upgrading config");

        document = (hop.apply)(&document).map_err(|e| Error::Upgrade {
            from: hop.from,
            to: hop.to,
            message: e.to_string(),
        })?;
        hops.push(AppliedHop {
            from: hop.from,
            to: hop.to,
        });
    }

    Ok(Upgraded { document, hops })
}
