//! Run-once cache of the global config and the resolved kube-context
//!
//! The global config file is read once per cache, and the context is
//! resolved once. Concurrent callers block until the first result exists
//! and then all observe the same value or the same error.

use super::global::{ContextConfig, GlobalConfig, default_config_path, read_global_config};
use super::resolver::resolve;
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

type Shared<T> = std::result::Result<Arc<T>, Arc<Error>>;

#[derive(Debug, Default)]
pub struct ContextConfigCache {
    /// Override for the global config file. `None` uses `~/.skiff/config`.
    config_path: Option<PathBuf>,
    global: OnceLock<Shared<GlobalConfig>>,
    context: OnceLock<(String, Shared<ContextConfig>)>,
}

impl ContextConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific global config file instead of the one in the home
    /// directory.
    pub fn with_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }

    /// The global config, read on first use.
    pub fn global_config(&self) -> Result<Arc<GlobalConfig>> {
        self.load_global().clone().map_err(Error::Cached)
    }

    /// The config for `context_name`, resolved on first use.
    ///
    /// Only the first context asked for is resolved. Asking for a different
    /// one later returns the cached context and logs a warning.
    pub fn context_config(&self, context_name: &str) -> Result<Arc<ContextConfig>> {
        let (resolved_for, outcome) = self.context.get_or_init(|| {
            let outcome = self
                .load_global()
                .clone()
                .map(|global| Arc::new(resolve(&global, context_name)));
            (context_name.to_string(), outcome)
        });

        if resolved_for != context_name {
            tracing::warn!(
                requested = context_name,
                cached = resolved_for.as_str(),
                "Kube-context config already resolved for a different context"
            );
        }

        outcome.clone().map_err(Error::Cached)
    }

    /// Forget both cached results.
    pub fn reset(&mut self) {
        self.global = OnceLock::new();
        self.context = OnceLock::new();
    }

    fn load_global(&self) -> &Shared<GlobalConfig> {
        self.global.get_or_init(|| {
            self.config_path()
                .and_then(|path| read_global_config(&path))
                .map(Arc::new)
                .map_err(Arc::new)
        })
    }
}
