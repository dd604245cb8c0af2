//! Pipeline schema definitions for skiff.
//!
//! Every historical document shape lives under [`schema`], one module per
//! API version. The [`registry`] maps version strings to strict decoders, the
//! [`validation`] module enforces `required`/`oneOf` field rules, and
//! [`upgrade`] walks a document forward one version at a time until it
//! reaches [`LATEST_VERSION`].
//!
//! ```text
//! bytes ──► detect apiVersion ──► registry decoder ──► validate ──► upgrade chain
//!                                                                      │
//!                              skiff/v1alpha1 ─► … ─► skiff/v1 ◄───────┘
//! ```

pub mod document;
pub mod error;
pub mod int_or_string;
pub mod registry;
pub mod schema;
pub mod upgrade;
pub mod validation;
pub mod version;

pub use document::{VersionedDocument, detect_api_version};
pub use error::{Error, Result};
pub use int_or_string::IntOrString;
pub use registry::{SchemaVersion, decode, find, latest_schema, lookup, versions};
pub use schema::latest;
pub use upgrade::{AppliedHop, Hop, UPGRADE_CHAIN, Upgraded, upgrade_to_latest, upgrade_with};
pub use validation::{Validate, Validator, validate};
pub use version::ApiVersion;

/// The newest schema version this build understands.
pub const LATEST_VERSION: &str = schema::v1::VERSION;
