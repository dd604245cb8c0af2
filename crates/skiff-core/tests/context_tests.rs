//! Kube-context resolution against a global config file

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use skiff_core::context::{mark_survey_prompted, mark_survey_taken, read_global_config};
use skiff_core::{ClusterType, ContextConfigCache, classify};
use skiff_test_utils::{TestProject, fixtures};

fn cache(project: &TestProject) -> ContextConfigCache {
    ContextConfigCache::with_config_path(project.write("config", fixtures::GLOBAL_CONFIG))
}

#[test]
fn test_last_matching_entry_wins() {
    let project = TestProject::new();

    let context = cache(&project).context_config("gke_project_zone_prod").unwrap();

    assert_eq!(context.default_repo.as_deref(), Some("gcr.io/broad"));
    assert_eq!(context.insecure_registries, vec!["global.registry:5000"]);
}

#[test]
fn test_unmatched_context_gets_global_settings() {
    let project = TestProject::new();

    let context = cache(&project).context_config("docker-desktop").unwrap();

    assert_eq!(context.kube_context, "docker-desktop");
    assert_eq!(context.default_repo.as_deref(), Some("gcr.io/global"));
}

#[test]
fn test_kind_with_load_disabled_pushes() {
    let project = TestProject::new();

    let context = cache(&project).context_config("kind-dev").unwrap();
    let decision = classify("kind-dev", &context, &Default::default());

    assert_eq!(
        context.insecure_registries,
        vec!["global.registry:5000", "kind.registry:5000"]
    );
    assert_eq!(decision.cluster_type, ClusterType::Kind);
    assert!(decision.local);
    assert!(!decision.load_images);
    assert!(decision.push_images);
}

#[test]
fn test_missing_global_config_is_created_empty() {
    let project = TestProject::new();
    let path = project.path(".skiff/config");
    let cache = ContextConfigCache::with_config_path(&path);

    let context = cache.context_config("minikube").unwrap();

    assert!(path.is_file());
    assert_eq!(context.kube_context, "minikube");
    assert_eq!(context.default_repo, None);
    assert!(classify("minikube", &context, &Default::default()).load_images);
}

#[test]
fn test_survey_marks_are_persisted() {
    let project = TestProject::new();
    let path = project.write("config", fixtures::GLOBAL_CONFIG);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    mark_survey_prompted(&path, now).unwrap();
    let global = read_global_config(&path).unwrap().global.unwrap();
    assert!(!global.should_display_survey_prompt(now + Duration::days(1)));
    assert!(global.should_display_survey_prompt(now + Duration::days(11)));

    mark_survey_taken(&path, now).unwrap();
    let config = read_global_config(&path).unwrap();
    let global = config.global.unwrap();
    assert!(!global.should_display_survey_prompt(now + Duration::days(30)));
    assert_eq!(global.default_repo.as_deref(), Some("gcr.io/global"));
    assert_eq!(config.contexts.len(), 3);
}
