//! Resolve the effective [`ContextConfig`] for a kube-context
//!
//! Entries in `kubeContexts` are scanned in file order and every entry whose
//! `kube-context` pattern matches is remembered, so the **last** matching
//! entry wins, not the most specific one. The `global` entry is then merged
//! underneath: fields the match leaves unset come from `global`, and lists
//! are concatenated with the global entries first.

use super::global::{ContextConfig, GlobalConfig};
use crate::merge::{MergeOptions, merge_typed};
use regex::Regex;

/// The settings that apply to `context_name`.
///
/// An empty name yields the `global` entry as is.
pub fn resolve(config: &GlobalConfig, context_name: &str) -> ContextConfig {
    let global = config.global.clone().unwrap_or_default();
    if context_name.is_empty() {
        return global;
    }

    let matched = config
        .contexts
        .iter()
        .rev()
        .find(|entry| pattern_matches(&entry.kube_context, context_name))
        .cloned()
        .unwrap_or_else(|| ContextConfig {
            kube_context: context_name.to_string(),
            ..Default::default()
        });

    tracing::debug!(
        context = context_name,
        pattern = matched.kube_context.as_str(),
        "Resolved kube-context config"
    );

    match merge_typed(&global, &matched, &MergeOptions::APPEND) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!(
                context = context_name,
                error = %e,
                "Failed to merge global config into kube-context config"
            );
            matched
        }
    }
}

/// Exact name, or a regex that matches somewhere in the name.
pub fn pattern_matches(pattern: &str, context_name: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    if pattern == context_name {
        return true;
    }
    match Regex::new(pattern) {
        Ok(re) => re.is_match(context_name),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "Ignoring invalid kube-context pattern");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn entry(pattern: &str, repo: &str) -> ContextConfig {
        ContextConfig {
            kube_context: pattern.into(),
            default_repo: Some(repo.into()),
            ..Default::default()
        }
    }

    fn global_config(contexts: Vec<ContextConfig>) -> GlobalConfig {
        GlobalConfig {
            global: Some(ContextConfig {
                default_repo: Some("g".into()),
                ..Default::default()
            }),
            contexts,
        }
    }

    #[rstest]
    #[case("prod", "p")]
    #[case("staging", "g")]
    fn test_anchored_pattern(#[case] context: &str, #[case] expected: &str) {
        let config = global_config(vec![entry("^prod$", "p")]);

        let resolved = resolve(&config, context);

        assert_eq!(resolved.default_repo.as_deref(), Some(expected));
    }

    #[test]
    fn test_last_match_wins() {
        let config = global_config(vec![
            entry("^gke_.*$", "specific-first"),
            entry("gke", "broad-last"),
        ]);

        let resolved = resolve(&config, "gke_project_zone_prod");

        assert_eq!(resolved.default_repo.as_deref(), Some("broad-last"));
        assert_eq!(resolved.kube_context, "gke");
    }

    #[test]
    fn test_empty_context_returns_global() {
        let config = global_config(vec![entry("", "never")]);

        let resolved = resolve(&config, "");

        assert_eq!(resolved.default_repo.as_deref(), Some("g"));
        assert_eq!(resolved.kube_context, "");
    }

    #[test]
    fn test_no_global_and_no_match() {
        let resolved = resolve(&GlobalConfig::default(), "minikube");

        assert_eq!(resolved.kube_context, "minikube");
        assert_eq!(resolved.default_repo, None);
    }

    #[test]
    fn test_global_fills_unset_fields_and_lists_append() {
        let config = GlobalConfig {
            global: Some(ContextConfig {
                default_repo: Some("g".into()),
                collect_metrics: Some(false),
                insecure_registries: vec!["global:5000".into()],
                ..Default::default()
            }),
            contexts: vec![ContextConfig {
                kube_context: "kind-dev".into(),
                kind_disable_load: Some(true),
                insecure_registries: vec!["local:5000".into()],
                ..Default::default()
            }],
        };

        let resolved = resolve(&config, "kind-dev");

        assert_eq!(resolved.kube_context, "kind-dev");
        assert_eq!(resolved.default_repo.as_deref(), Some("g"));
        assert_eq!(resolved.collect_metrics, Some(false));
        assert_eq!(resolved.kind_disable_load, Some(true));
        assert_eq!(resolved.insecure_registries, vec!["global:5000", "local:5000"]);
    }

    #[test]
    fn test_context_overrides_global_scalars() {
        let config = GlobalConfig {
            global: Some(ContextConfig {
                local_cluster: Some(true),
                ..Default::default()
            }),
            contexts: vec![ContextConfig {
                kube_context: "remote".into(),
                local_cluster: Some(false),
                ..Default::default()
            }],
        };

        assert_eq!(resolve(&config, "remote").local_cluster, Some(false));
    }

    #[rstest]
    #[case("kind-(", "kind-(", true)]
    #[case("kind-(", "kind-x", false)]
    #[case("", "anything", false)]
    #[case("dev", "my-dev-cluster", true)]
    fn test_pattern_matches(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        assert_eq!(pattern_matches(pattern, name), expected);
    }
}
