//! Pipeline documents used across test suites.
//!
//! Each constant is valid at its own schema version.

pub const V1ALPHA1: &str = r#"apiVersion: skiff/v1alpha1
build:
  artifacts:
  - image: gcr.io/example/app
    docker:
      dockerfile: Dockerfile
  tagPolicy:
    gitCommit: {}
profiles:
- name: charts
  deploy:
    helm:
      releases:
      - name: app
        chartPath: charts/app
        valuesFilePath: values.yaml
"#;

pub const V1BETA2: &str = r#"apiVersion: skiff/v1beta2
build:
  artifacts:
  - image: gcr.io/example/app
  local:
    push: true
deploy:
  helm:
    releases:
    - name: app
      chartPath: charts/app
      valuesFilePath: values-prod.yaml
"#;

pub const V1: &str = r#"apiVersion: skiff/v1
build:
  artifacts:
  - image: gcr.io/example/app
    docker:
      dockerfile: Dockerfile
  tagPolicy:
    gitCommit: {}
  local:
    push: false
deploy:
  kubectl:
    manifests:
    - k8s/*.yaml
portForward:
- resourceType: service
  resourceName: app
  port: 8080
profiles:
- name: gcb
  build:
    googleCloudBuild:
      projectId: example-project
- name: helm
  deploy:
    helm:
      releases:
      - name: app
        chartPath: charts/app
- name: ci
  activation:
  - env: CI=true
  build:
    tagPolicy:
      sha256: {}
"#;

/// A sidecar for profile `dev` that switches the deployer to kustomize.
pub const V1_DEV_SIDECAR: &str = r#"apiVersion: skiff/v1
deploy:
  kustomize:
    path: overlays/dev
"#;

pub const TOO_NEW: &str = "apiVersion: skiff/v9\n";

pub const GLOBAL_CONFIG: &str = r#"global:
  default-repo: gcr.io/global
  insecure-registries:
  - global.registry:5000
kubeContexts:
- kube-context: ^gke_.*$
  default-repo: gcr.io/gke
- kube-context: kind-dev
  kind-disable-load: true
  insecure-registries:
  - kind.registry:5000
- kube-context: gke
  default-repo: gcr.io/broad
"#;
