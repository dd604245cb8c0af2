//! Config resolution for skiff
//!
//! This crate sits above the schema and filesystem crates and provides:
//!
//! - **Parsing**: read a pipeline config from a file, stdin, or URL, decode it
//!   strictly, validate it, and upgrade it to the latest schema
//! - **Profile sidecars**: layer `<stem>_<profile>.yaml` files over the base
//! - **Profiles**: activate in-document profiles and overlay them
//! - **Kube-context config**: resolve per-context settings from the global
//!   config and classify the target cluster
//!
//! ```text
//!                 skiff-core
//!                     |
//!          +----------+----------+
//!          |                     |
//!     skiff-schema           skiff-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use skiff_core::{ActivationContext, activated_profiles, apply_profiles, parse_config};
//!
//! let config = parse_config("skiff.yaml", true, &[])?;
//! let context = ActivationContext::from_env("minikube", "dev");
//! let names = activated_profiles(&config, &context, &[]);
//! let effective = apply_profiles(&config, &names)?;
//! ```

pub mod context;
pub mod error;
pub mod merge;
pub mod parser;
pub mod profiles;

pub use context::{
    ClassifyOptions, ClusterDecision, ClusterType, ContextConfig, ContextConfigCache,
    GlobalConfig, LocalClusterProbe, classify, resolve,
};
pub use error::{Error, Result};
pub use merge::{MergeOptions, SliceMerge, deep_merge, merge_typed};
pub use parser::{
    ConfigParser, ParseOptions, encode_config, parse_config, parse_single_config_file,
    write_config,
};
pub use profiles::{ActivationContext, activated_profiles, apply_profiles};
