//! Shared test utilities for the skiff workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: pipeline documents at every schema version
//! - [`project`]: [`TestProject`] for laying out configs on disk

pub mod fixtures;
pub mod project;

pub use project::TestProject;
