//! In-document profiles: activation and application
//!
//! A profile is activated when it is named explicitly or when one of its
//! `activation` entries matches the current environment. Activated profiles
//! are overlaid on the base config in order; each overlay replaces sequences
//! and clears oneOf siblings that it displaces.

use crate::merge::{MergeOptions, deep_merge};
use crate::{Error, Result};
use regex::Regex;
use skiff_schema::latest::{self, Activation, Profile};
use std::collections::BTreeMap;

/// What activation conditions are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationContext {
    pub env: BTreeMap<String, String>,
    pub kube_context: String,
    pub command: String,
}

impl ActivationContext {
    /// Snapshot the process environment.
    pub fn from_env(kube_context: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            env: std::env::vars().collect(),
            kube_context: kube_context.into(),
            command: command.into(),
        }
    }
}

/// Names of the profiles to apply.
///
/// Explicitly requested names come first, in the order given, followed by
/// profiles whose activation matches `context`, in document order. Requested
/// names that the document does not define are kept so that
/// [`apply_profiles`] reports them.
pub fn activated_profiles(
    config: &latest::Config,
    context: &ActivationContext,
    explicit: &[String],
) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(explicit.len());
    for name in explicit {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    for profile in &config.profiles {
        if !names.contains(&profile.name) && is_activated(profile, context) {
            names.push(profile.name.clone());
        }
    }
    names
}

fn is_activated(profile: &Profile, context: &ActivationContext) -> bool {
    let activated = profile
        .activation
        .iter()
        .any(|activation| matches_activation(activation, context));
    if activated {
        tracing::debug!(profile = profile.name.as_str(), "Profile activated");
    }
    activated
}

/// Every condition set on the entry must hold. An entry with no conditions
/// never matches.
fn matches_activation(activation: &Activation, context: &ActivationContext) -> bool {
    if activation == &Activation::default() {
        return false;
    }

    if !activation.env.is_empty() {
        let Some((key, expected)) = activation.env.split_once('=') else {
            tracing::debug!(env = activation.env.as_str(), "Activation env must be KEY=VALUE");
            return false;
        };
        let actual = context.env.get(key).map(String::as_str).unwrap_or_default();
        if !satisfies(expected, actual) {
            return false;
        }
    }

    if !activation.kube_context.is_empty()
        && !satisfies(&activation.kube_context, &context.kube_context)
    {
        return false;
    }

    activation.command.is_empty() || activation.command == context.command
}

/// Full-match `expected` as a regex against `actual`. A leading `!` negates.
fn satisfies(expected: &str, actual: &str) -> bool {
    match expected.strip_prefix('!') {
        Some(negated) => !full_match(negated, actual),
        None => full_match(expected, actual),
    }
}

fn full_match(pattern: &str, actual: &str) -> bool {
    if pattern == actual {
        return true;
    }
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => re.is_match(actual),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "Invalid activation pattern");
            false
        }
    }
}

/// Overlay the named profiles on the base config, in order.
///
/// The profile list itself is kept so the result can be re-serialized.
pub fn apply_profiles(config: &latest::Config, names: &[String]) -> Result<latest::Config> {
    if names.is_empty() {
        return Ok(config.clone());
    }

    let groups = latest::exclusive_key_groups();
    let options = MergeOptions::REPLACE.with_exclusive(&groups);
    let mut merged = serde_json::to_value(config)?;

    for name in names {
        let profile = config
            .profile(name)
            .ok_or_else(|| Error::ProfileNotFound { name: name.clone() })?;
        tracing::debug!(profile = name.as_str(), "Applying profile");

        let overlay = serde_json::json!({
            "build": profile.build,
            "test": profile.test,
            "deploy": profile.deploy,
        });
        deep_merge(&mut merged, &sections_only(overlay), &options);
    }

    let merged: latest::Config = serde_json::from_value(merged)?;
    skiff_schema::validate(&merged)?;
    Ok(merged)
}

// Unset sections must not clobber the base: drop empty objects and arrays.
fn sections_only(mut overlay: serde_json::Value) -> serde_json::Value {
    if let Some(map) = overlay.as_object_mut() {
        map.retain(|_, value| match value {
            serde_json::Value::Object(inner) => !inner.is_empty(),
            serde_json::Value::Array(inner) => !inner.is_empty(),
            _ => true,
        });
    }
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn context(env: &[(&str, &str)], kube_context: &str, command: &str) -> ActivationContext {
        ActivationContext {
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            kube_context: kube_context.into(),
            command: command.into(),
        }
    }

    fn activation(env: &str, kube_context: &str, command: &str) -> Activation {
        Activation {
            env: env.into(),
            kube_context: kube_context.into(),
            command: command.into(),
        }
    }

    #[rstest]
    #[case(activation("CI=true", "", ""), true)]
    #[case(activation("CI=false", "", ""), false)]
    #[case(activation("CI=t.*", "", ""), true)]
    #[case(activation("CI=!true", "", ""), false)]
    #[case(activation("MISSING=", "", ""), true)]
    #[case(activation("", "minikube", ""), true)]
    #[case(activation("", "gke_.*", ""), false)]
    #[case(activation("", "!gke_.*", ""), true)]
    #[case(activation("", "", "dev"), true)]
    #[case(activation("", "", "run"), false)]
    #[case(activation("CI=true", "minikube", "run"), false)]
    #[case(activation("CI", "", ""), false)]
    #[case(activation("", "", ""), false)]
    fn test_activation_conditions(#[case] entry: Activation, #[case] expected: bool) {
        let ctx = context(&[("CI", "true")], "minikube", "dev");

        assert_eq!(matches_activation(&entry, &ctx), expected);
    }

    #[test]
    fn test_invalid_pattern_only_matches_itself() {
        assert!(!full_match("gke_[", "gke_x"));
        assert!(full_match("gke_[", "gke_["));
    }
}
