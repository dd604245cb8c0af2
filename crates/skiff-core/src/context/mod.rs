//! Per-kube-context settings from the user's global config
//!
//! - [`global`]: the `~/.skiff/config` file and its survey/update helpers
//! - [`resolver`]: picking the entry for a context and merging `global` under it
//! - [`cluster`]: deciding whether a cluster is local and how images reach it
//! - [`cache`]: run-once caching of the above for one process

pub mod cache;
pub mod cluster;
pub mod global;
pub mod resolver;

pub use cache::ContextConfigCache;
pub use cluster::{ClassifyOptions, ClusterDecision, ClusterType, LocalClusterProbe, classify};
pub use global::{
    ContextConfig, GlobalConfig, SurveyConfig, UpdateConfig, default_config_path,
    mark_survey_prompted, mark_survey_taken, mark_update_prompted, read_global_config,
    update_global_config, write_global_config,
};
pub use resolver::{pattern_matches, resolve};
