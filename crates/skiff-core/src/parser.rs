//! Pipeline config parsing
//!
//! [`ConfigParser::parse_single_config_file`] turns one source into a
//! validated, optionally upgraded document. [`ConfigParser::parse_config`]
//! additionally layers profile sidecar files (`skiff_dev.yaml` next to
//! `skiff.yaml` for profile `dev`) over the base.
//!
//! The primary document is fail-fast: any read, decode, validation, or
//! upgrade failure is returned. Sidecars are best-effort: a broken sidecar is
//! logged and skipped.

use crate::merge::{MergeOptions, merge_typed};
use crate::{Error, Result};
use skiff_fs::{ConfigSource, FetchOptions, io};
use skiff_schema::{LATEST_VERSION, Upgraded, VersionedDocument, latest, upgrade_to_latest};
use std::path::{Path, PathBuf};

/// Options for [`ConfigParser`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub fetch: FetchOptions,
    /// Extensions tried for profile sidecar files, in order.
    pub sidecar_extensions: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            sidecar_extensions: vec!["yaml".into(), "yml".into()],
        }
    }
}

/// Reads pipeline configs from files, stdin, or URLs.
#[derive(Debug, Clone, Default)]
pub struct ConfigParser {
    options: ParseOptions,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read, decode, validate, and optionally upgrade one document.
    ///
    /// `source` is a path, `-` for stdin, or an `http(s)://` URL. Without
    /// `upgrade` the document is returned at its own version with no hops.
    pub fn parse_single_config_file(&self, source: &str, upgrade: bool) -> Result<Upgraded> {
        let source = ConfigSource::parse(source);
        tracing::debug!(%source, upgrade, "Parsing config");

        let bytes = source.read(&self.options.fetch)?;
        let document = skiff_schema::decode(&bytes)?;
        document.validate()?;

        if !upgrade || document.is_latest() {
            return Ok(Upgraded {
                document,
                hops: Vec::new(),
            });
        }

        let upgraded = upgrade_to_latest(document)?;
        tracing::debug!(%source, hops = upgraded.hops.len(), "Upgraded config");
        Ok(upgraded)
    }

    /// Parse the base config and layer the sidecars of `profiles` on top.
    ///
    /// The base must end up at the latest version. Sidecars are looked up
    /// only for file sources.
    pub fn parse_config(
        &self,
        source: &str,
        upgrade: bool,
        profiles: &[String],
    ) -> Result<latest::Config> {
        let parsed = self.parse_single_config_file(source, upgrade)?;
        let mut config = parsed
            .document
            .into_latest()
            .map_err(|document| Error::OutOfDate {
                location: source.to_string(),
                version: document.api_version().to_string(),
                latest: LATEST_VERSION.to_string(),
            })?;

        let Some(path) = ConfigSource::parse(source).path().map(Path::to_path_buf) else {
            return Ok(config);
        };

        for profile in profiles {
            let Some(sidecar) = self.find_sidecar(&path, profile) else {
                continue;
            };

            match self.merge_sidecar(&config, &sidecar, upgrade) {
                Ok(merged) => {
                    tracing::debug!(
                        profile = profile.as_str(),
                        path = %sidecar.display(),
                        "Applied profile sidecar"
                    );
                    config = merged;
                }
                Err(e) => {
                    tracing::warn!(
                        profile = profile.as_str(),
                        path = %sidecar.display(),
                        error = %e,
                        "Skipping profile sidecar"
                    );
                }
            }
        }

        Ok(config)
    }

    /// `<dir>/<stem>_<profile>.<ext>` for the first extension that exists.
    pub fn find_sidecar(&self, base: &Path, profile: &str) -> Option<PathBuf> {
        let stem = base.file_stem()?.to_string_lossy();
        let dir = base.parent().unwrap_or_else(|| Path::new(""));

        self.options
            .sidecar_extensions
            .iter()
            .map(|ext| dir.join(format!("{stem}_{profile}.{ext}")))
            .find(|candidate| candidate.is_file())
    }

    fn merge_sidecar(
        &self,
        base: &latest::Config,
        sidecar: &Path,
        upgrade: bool,
    ) -> Result<latest::Config> {
        let overlay = self
            .parse_single_config_file(&sidecar.to_string_lossy(), upgrade)?
            .document
            .into_latest()
            .map_err(|document| Error::OutOfDate {
                location: sidecar.display().to_string(),
                version: document.api_version().to_string(),
                latest: LATEST_VERSION.to_string(),
            })?;

        let groups = latest::exclusive_key_groups();
        let merged: latest::Config =
            merge_typed(base, &overlay, &MergeOptions::REPLACE.with_exclusive(&groups))?;
        skiff_schema::validate(&merged)?;
        Ok(merged)
    }

    /// Upgrade `source` to the latest version and write it to `output`.
    pub fn fix(&self, source: &str, output: &Path) -> Result<Upgraded> {
        let upgraded = self.parse_single_config_file(source, true)?;
        write_config(output, &upgraded.document)?;
        Ok(upgraded)
    }
}

/// Encode a document as YAML.
pub fn encode_config(document: &VersionedDocument) -> Result<String> {
    Ok(document.to_yaml()?)
}

/// Encode a document and write it atomically.
pub fn write_config(path: &Path, document: &VersionedDocument) -> Result<()> {
    let yaml = encode_config(document)?;
    io::write_atomic(path, yaml.as_bytes())?;
    Ok(())
}

/// [`ConfigParser::parse_single_config_file`] with default options.
pub fn parse_single_config_file(source: &str, upgrade: bool) -> Result<Upgraded> {
    ConfigParser::new().parse_single_config_file(source, upgrade)
}

/// [`ConfigParser::parse_config`] with default options.
pub fn parse_config(source: &str, upgrade: bool, profiles: &[String]) -> Result<latest::Config> {
    ConfigParser::new().parse_config(source, upgrade, profiles)
}
