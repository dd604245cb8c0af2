//! Config source resolution
//!
//! A pipeline document can come from three places:
//!
//! - a path on disk (`skiff.yaml`)
//! - standard input (the literal `-`)
//! - a remote URL (`http://` or `https://`), fetched with a single
//!   unauthenticated GET

use crate::{Error, Result, io};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The literal source string that selects standard input.
pub const STDIN_SOURCE: &str = "-";

/// Where a config document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Stdin,
    Url(String),
}

/// Options for fetching remote documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Overall request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ConfigSource {
    /// Classify a user-supplied source string.
    pub fn parse(source: &str) -> Self {
        if source == STDIN_SOURCE {
            Self::Stdin
        } else if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }

    /// The on-disk path, for file sources only.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin | Self::Url(_) => None,
        }
    }

    /// Read the whole document.
    pub fn read(&self, options: &FetchOptions) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => io::read_bytes(path),
            Self::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .map_err(Error::Stdin)?;
                Ok(buf)
            }
            Self::Url(url) => fetch(url, options),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
            Self::Url(url) => f.write_str(url),
        }
    }
}

fn fetch(url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
    tracing::debug!(url, timeout = ?options.timeout, "Fetching remote config");

    let mut builder = ureq::AgentBuilder::new();
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let agent = builder.build();

    let fetch_error = |message: String| Error::Fetch {
        url: url.to_string(),
        message,
    };

    let response = agent
        .get(url)
        .call()
        .map_err(|e| fetch_error(e.to_string()))?;

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| fetch_error(e.to_string()))?;
    Ok(body)
}
