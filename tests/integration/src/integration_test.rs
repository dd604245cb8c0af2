//! End-to-end test of the config pipeline
//!
//! Exercises the full flow: read -> decode -> validate -> upgrade -> sidecars
//! -> profiles -> kube-context settings.

use pretty_assertions::assert_eq;
use skiff_core::{
    ActivationContext, ClusterType, ContextConfigCache, activated_profiles, apply_profiles,
    classify, encode_config, parse_config,
};
use skiff_schema::VersionedDocument;
use skiff_test_utils::{TestProject, fixtures};

/// An old pipeline with a sidecar for `dev` and a global config next to it.
fn setup_project() -> TestProject {
    let project = TestProject::new();
    project.write_config(fixtures::V1ALPHA1);
    project.write_sidecar(
        "dev",
        "yaml",
        r#"apiVersion: skiff/v1beta2
build:
  tagPolicy:
    sha256: {}
"#,
    );
    project.write("home/.skiff/config", fixtures::GLOBAL_CONFIG);
    project
}

#[test]
fn test_parse_upgrade_and_apply_profiles() {
    let project = setup_project();
    let source = project.path("skiff.yaml").to_string_lossy().into_owned();

    let config = parse_config(&source, true, &["dev".to_string()]).unwrap();
    assert!(config.build.tag_policy.sha256.is_some());
    assert!(config.build.tag_policy.git_commit.is_none());

    let context = ActivationContext {
        kube_context: "kind-dev".into(),
        command: "run".into(),
        ..Default::default()
    };
    let names = activated_profiles(&config, &context, &["charts".to_string()]);
    assert_eq!(names, vec!["charts"]);

    let effective = apply_profiles(&config, &names).unwrap();
    insta::assert_snapshot!(encode_config(&VersionedDocument::from(effective)).unwrap(), @r"
    apiVersion: skiff/v1
    build:
      artifacts:
      - image: gcr.io/example/app
        docker:
          dockerfile: Dockerfile
      tagPolicy:
        sha256: {}
    deploy:
      helm:
        releases:
        - name: app
          chartPath: charts/app
          valuesFiles:
          - values.yaml
    profiles:
    - name: charts
      deploy:
        helm:
          releases:
          - name: app
            chartPath: charts/app
            valuesFiles:
            - values.yaml
    ");
}

#[test]
fn test_context_settings_for_local_cluster() {
    let project = setup_project();
    let cache = ContextConfigCache::with_config_path(project.path("home/.skiff/config"));

    let context = cache.context_config("kind-dev").unwrap();
    let decision = classify("kind-dev", &context, &Default::default());

    assert_eq!(decision.cluster_type, ClusterType::Kind);
    assert!(decision.push_images);
    assert_eq!(
        context.default_repo(None).as_deref(),
        Some("gcr.io/global")
    );
    assert_eq!(
        context.insecure_registries(&["cli.registry:5000".to_string()]),
        vec!["cli.registry:5000", "global.registry:5000", "kind.registry:5000"]
    );
}
