//! Filesystem and source plumbing for skiff
//!
//! Resolves config sources (file, stdin, remote URL) into bytes and provides
//! atomic writes and format-aware load/save for YAML and JSON documents.

pub mod config;
pub mod error;
pub mod io;
pub mod source;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use source::{ConfigSource, FetchOptions, STDIN_SOURCE};
