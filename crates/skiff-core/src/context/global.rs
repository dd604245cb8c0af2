//! The user's global config file (`~/.skiff/config`)
//!
//! ```yaml
//! global:
//!   default-repo: gcr.io/team
//!   survey:
//!     last-prompted: "2024-03-01T10:00:00Z"
//! kubeContexts:
//!   - kube-context: ^gke_.*prod$
//!     default-repo: gcr.io/prod
//!   - kube-context: kind-dev
//!     kind-disable-load: true
//! ```

use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use skiff_fs::{ConfigStore, io};
use std::path::{Path, PathBuf};

/// Directory under the home directory holding skiff's own files.
pub const GLOBAL_CONFIG_DIR: &str = ".skiff";

/// File name of the global config inside [`GLOBAL_CONFIG_DIR`].
pub const GLOBAL_CONFIG_FILE: &str = "config";

/// Don't ask again for this long after the survey was taken.
pub const SURVEY_TAKEN_QUIET_DAYS: i64 = 90;

/// Don't ask again for this long after the last prompt.
pub const SURVEY_PROMPT_QUIET_DAYS: i64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<ContextConfig>,
    #[serde(rename = "kubeContexts", skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<ContextConfig>,
}

/// Settings that apply to one kube-context, or to all of them when used as
/// the `global` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContextConfig {
    /// Context name, or a regex over context names.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kube_context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_level_repo: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub insecure_registries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_cluster: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind_disable_load: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k3d_disable_load: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey: Option<SurveyConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_metrics: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SurveyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_prompt: Option<bool>,
    /// RFC 3339 timestamp.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_taken: String,
    /// RFC 3339 timestamp.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_prompted: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UpdateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<bool>,
    /// RFC 3339 timestamp.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_prompted: String,
}

impl ContextConfig {
    /// The image repository to push to. A value from the command line wins.
    pub fn default_repo(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string).or_else(|| self.default_repo.clone())
    }

    /// Command-line registries first, then configured ones, without repeats.
    pub fn insecure_registries(&self, cli: &[String]) -> Vec<String> {
        let mut registries: Vec<String> = Vec::new();
        for registry in cli.iter().chain(&self.insecure_registries) {
            if !registries.contains(registry) {
                registries.push(registry.clone());
            }
        }
        registries
    }

    pub fn update_check_enabled(&self) -> bool {
        self.update.as_ref().and_then(|u| u.check).unwrap_or(true)
    }

    pub fn collect_metrics(&self) -> bool {
        self.collect_metrics.unwrap_or(true)
    }

    /// Whether the feedback survey may be shown at `now`.
    ///
    /// Not if prompting is disabled, the survey was taken in the last
    /// [`SURVEY_TAKEN_QUIET_DAYS`], or the user was prompted in the last
    /// [`SURVEY_PROMPT_QUIET_DAYS`]. Unparseable timestamps count as never.
    pub fn should_display_survey_prompt(&self, now: DateTime<Utc>) -> bool {
        let Some(survey) = &self.survey else {
            return true;
        };
        if survey.disable_prompt == Some(true) {
            return false;
        }

        let taken_window = Duration::days(SURVEY_TAKEN_QUIET_DAYS);
        let prompted_window = Duration::days(SURVEY_PROMPT_QUIET_DAYS);
        let taken_recently = within(&survey.last_taken, now, taken_window);
        let prompted_recently = within(&survey.last_prompted, now, prompted_window);
        !(taken_recently || prompted_recently)
    }
}

fn within(timestamp: &str, now: DateTime<Utc>, window: Duration) -> bool {
    if timestamp.is_empty() {
        return false;
    }
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(at) => now.signed_duration_since(at.with_timezone(&Utc)) < window,
        Err(e) => {
            tracing::debug!(timestamp, error = %e, "Ignoring malformed timestamp");
            false
        }
    }
}

/// `~/.skiff/config`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
        .ok_or(Error::NoHomeDir)
}

/// Read the global config, creating an empty file if there is none.
pub fn read_global_config(path: &Path) -> Result<GlobalConfig> {
    if io::ensure_file(path)? {
        tracing::debug!(path = %path.display(), "Created empty global config");
    }
    tracing::debug!(path = %path.display(), "Loading global config");
    Ok(ConfigStore::new().load(path)?)
}

pub fn write_global_config(path: &Path, config: &GlobalConfig) -> Result<()> {
    Ok(ConfigStore::new().save(path, config)?)
}

/// Read, modify, and write back the global config.
pub fn update_global_config(path: &Path, update: impl FnOnce(&mut GlobalConfig)) -> Result<()> {
    let mut config = read_global_config(path)?;
    update(&mut config);
    write_global_config(path, &config)
}

/// Record that the survey prompt was shown at `now`.
pub fn mark_survey_prompted(path: &Path, now: DateTime<Utc>) -> Result<()> {
    update_global_config(path, |config| {
        let global = config.global.get_or_insert_with(Default::default);
        global.survey.get_or_insert_with(Default::default).last_prompted = now.to_rfc3339();
    })
}

/// Record that the survey was taken at `now`.
pub fn mark_survey_taken(path: &Path, now: DateTime<Utc>) -> Result<()> {
    update_global_config(path, |config| {
        let global = config.global.get_or_insert_with(Default::default);
        global.survey.get_or_insert_with(Default::default).last_taken = now.to_rfc3339();
    })
}

/// Record that the update notice was shown at `now`.
pub fn mark_update_prompted(path: &Path, now: DateTime<Utc>) -> Result<()> {
    update_global_config(path, |config| {
        let global = config.global.get_or_insert_with(Default::default);
        global.update.get_or_insert_with(Default::default).last_prompted = now.to_rfc3339();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days)).to_rfc3339()
    }

    fn survey(
        disable_prompt: Option<bool>,
        last_taken: &str,
        last_prompted: &str,
    ) -> ContextConfig {
        ContextConfig {
            survey: Some(SurveyConfig {
                disable_prompt,
                last_taken: last_taken.into(),
                last_prompted: last_prompted.into(),
            }),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(survey(None, "", ""), true)]
    #[case(survey(Some(true), "", ""), false)]
    #[case(survey(None, &days_ago(30), ""), false)]
    #[case(survey(None, &days_ago(91), ""), true)]
    #[case(survey(None, "", &days_ago(5)), false)]
    #[case(survey(None, "", &days_ago(11)), true)]
    #[case(survey(None, "not-a-date", "yesterday"), true)]
    #[case(ContextConfig::default(), true)]
    fn test_survey_prompt_rules(#[case] config: ContextConfig, #[case] expected: bool) {
        assert_eq!(config.should_display_survey_prompt(now()), expected);
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ContextConfig::default();

        assert!(config.update_check_enabled());
        assert!(config.collect_metrics());
        assert_eq!(config.default_repo(None), None);
    }

    #[test]
    fn test_cli_values_win() {
        let config = ContextConfig {
            default_repo: Some("gcr.io/config".into()),
            insecure_registries: vec!["a:5000".into(), "b:5000".into()],
            ..Default::default()
        };

        assert_eq!(config.default_repo(Some("gcr.io/cli")).as_deref(), Some("gcr.io/cli"));
        assert_eq!(config.default_repo(None).as_deref(), Some("gcr.io/config"));
        assert_eq!(
            config.insecure_registries(&["b:5000".into(), "c:5000".into()]),
            vec!["b:5000", "c:5000", "a:5000"]
        );
    }

    #[test]
    fn test_missing_file_is_created_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".skiff").join("config");

        let config = read_global_config(&path).unwrap();

        assert_eq!(config, GlobalConfig::default());
        assert!(path.is_file());
    }

    #[test]
    fn test_kebab_case_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        std::fs::write(
            &path,
            concat!(
                "global:\n  default-repo: g\n  collect-metrics: false\n",
                "kubeContexts:\n- kube-context: kind-dev\n  kind-disable-load: true\n",
            ),
        )
        .unwrap();

        let config = read_global_config(&path).unwrap();

        let global = config.global.unwrap();
        assert_eq!(global.default_repo.as_deref(), Some("g"));
        assert!(!global.collect_metrics());
        assert_eq!(config.contexts[0].kube_context, "kind-dev");
        assert_eq!(config.contexts[0].kind_disable_load, Some(true));
    }

    #[test]
    fn test_written_file_uses_kebab_case() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");

        write_global_config(
            &path,
            &GlobalConfig {
                global: Some(ContextConfig {
                    default_repo: Some("gcr.io/team".into()),
                    ..Default::default()
                }),
                contexts: vec![ContextConfig {
                    kube_context: "kind-dev".into(),
                    kind_disable_load: Some(true),
                    insecure_registries: vec!["localhost:5000".into()],
                    ..Default::default()
                }],
            },
        )
        .unwrap();

        insta::assert_snapshot!(std::fs::read_to_string(&path).unwrap(), @r"
        global:
          default-repo: gcr.io/team
        kubeContexts:
        - kube-context: kind-dev
          insecure-registries:
          - localhost:5000
          kind-disable-load: true
        ");
    }

    #[test]
    fn test_mark_survey_prompted_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");

        mark_survey_prompted(&path, now()).unwrap();
        mark_update_prompted(&path, now()).unwrap();

        let global = read_global_config(&path).unwrap().global.unwrap();
        assert_eq!(global.survey.as_ref().unwrap().last_prompted, now().to_rfc3339());
        assert_eq!(global.update.as_ref().unwrap().last_prompted, now().to_rfc3339());
        assert!(!global.should_display_survey_prompt(now() + Duration::days(1)));
        assert!(global.should_display_survey_prompt(now() + Duration::days(11)));
    }

    #[test]
    fn test_mark_survey_taken_keeps_other_settings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        write_global_config(
            &path,
            &GlobalConfig {
                global: Some(ContextConfig {
                    default_repo: Some("gcr.io/keep".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .unwrap();

        mark_survey_taken(&path, now()).unwrap();

        let global = read_global_config(&path).unwrap().global.unwrap();
        assert_eq!(global.default_repo.as_deref(), Some("gcr.io/keep"));
        assert_eq!(global.survey.unwrap().last_taken, now().to_rfc3339());
    }
}
