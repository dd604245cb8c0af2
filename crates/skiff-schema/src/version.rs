//! Ordered API version identifiers.
//!
//! Versions follow the Kubernetes convention `<group>/v<major>[alpha|beta<n>]`.
//! They are mapped onto semver so ordering comes for free:
//!
//! | api version       | semver          |
//! |-------------------|-----------------|
//! | `skiff/v1alpha2`  | `1.0.0-alpha.2` |
//! | `skiff/v1beta1`   | `1.0.0-beta.1`  |
//! | `skiff/v1`        | `1.0.0`         |
//!
//! # Examples
//!
//! ```
//! use skiff_schema::ApiVersion;
//!
//! let alpha = ApiVersion::parse("skiff/v1alpha2").unwrap();
//! let beta = ApiVersion::parse("skiff/v1beta1").unwrap();
//! let ga = ApiVersion::parse("skiff/v1").unwrap();
//! assert!(alpha < beta && beta < ga);
//! ```

use crate::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The API group every skiff document version belongs to.
pub const API_GROUP: &str = "skiff";

#[derive(Debug, Clone)]
pub struct ApiVersion {
    raw: String,
    semver: semver::Version,
}

impl ApiVersion {
    pub fn parse(version: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVersion {
            version: version.to_string(),
            reason: reason.to_string(),
        };

        let rest = version
            .strip_prefix(API_GROUP)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(|| invalid("expected the skiff/ group prefix"))?;
        let rest = rest
            .strip_prefix('v')
            .ok_or_else(|| invalid("expected a v<major> version"))?;

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (major, stage) = rest.split_at(digits_end);
        let major: u64 = major.parse().map_err(|_| invalid("missing major version"))?;

        let pre = if stage.is_empty() {
            semver::Prerelease::EMPTY
        } else {
            let (label, number) = ["alpha", "beta"]
                .iter()
                .find_map(|label| stage.strip_prefix(label).map(|n| (*label, n)))
                .ok_or_else(|| invalid("stage must be alpha or beta"))?;
            let number: u64 = number
                .parse()
                .map_err(|_| invalid("stage needs a numeric suffix"))?;
            semver::Prerelease::new(&format!("{label}.{number}"))
                .map_err(|e| invalid(&e.to_string()))?
        };

        Ok(Self {
            raw: version.to_string(),
            semver: semver::Version {
                major,
                minor: 0,
                patch: 0,
                pre,
                build: semver::BuildMetadata::EMPTY,
            },
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn semver(&self) -> &semver::Version {
        &self.semver
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.semver == other.semver
    }
}

impl Eq for ApiVersion {}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semver.cmp(&other.semver)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
