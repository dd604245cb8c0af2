//! `skiff/v1`, the current pipeline schema.
//!
//! New in this version: helm `valuesFiles`, `build.insecureRegistries`,
//! top-level `portForward`, and `profiles[].activation`.
//!
//! ```yaml
//! apiVersion: skiff/v1
//! build:
//!   artifacts:
//!     - image: gcr.io/example/app
//! deploy:
//!   helm:
//!     releases:
//!       - name: app
//!         chartPath: charts/app
//!         valuesFiles: [values.yaml, values-dev.yaml]
//! portForward:
//!   - resourceType: service
//!     resourceName: app
//!     port: http
//!     localPort: 9000
//! profiles:
//!   - name: ci
//!     activation:
//!       - env: CI=true
//! ```

pub use crate::schema::v1beta1::LocalBuild;
pub use crate::schema::v1beta2::{Artifact, ClusterDetails, KanikoArtifact};

use crate::Result;
use crate::int_or_string::IntOrString;
use crate::rules;
use crate::schema::common::{
    GoogleCloudBuild, KanikoBuildContext, KubectlDeploy, KustomizeDeploy, TagPolicy, TestCase,
};
use crate::validation::{FieldRule, Rule, Validate, Validator, one_of_groups};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "skiff/v1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub build: BuildConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test: Vec<TestCase>,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub deploy: DeployConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub port_forward: Vec<PortForwardResource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,
}

impl Config {
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }
}

impl Validate for Config {
    const TYPE_NAME: &'static str = "Config";
    const RULES: &'static [FieldRule<Self>] = rules![Config;
        "apiVersion" => Rule::Required, api_version;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate(&self.build)?;
        validator.validate_each(&self.test)?;
        validator.validate(&self.deploy)?;
        validator.validate_each(&self.port_forward)?;
        validator.validate_each(&self.profiles)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub build: BuildConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test: Vec<TestCase>,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub deploy: DeployConfig,
    /// Conditions that switch the profile on without naming it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activation: Vec<Activation>,
}

impl Validate for Profile {
    const TYPE_NAME: &'static str = "Profile";
    const RULES: &'static [FieldRule<Self>] = rules![Profile;
        "name" => Rule::Required, name;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate(&self.build)?;
        validator.validate_each(&self.test)?;
        validator.validate(&self.deploy)
    }
}

/// One activation entry. Every condition that is set must hold.
///
/// `env` is `KEY=regex`, `kubeContext` is a regex over the current context
/// name, and `command` is compared verbatim with the running command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Activation {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub env: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kube_context: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    /// Registries reached over plain HTTP or with self-signed certificates.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub insecure_registries: Vec<String>,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub tag_policy: TagPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalBuild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_cloud_build: Option<GoogleCloudBuild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterDetails>,
}

impl Validate for BuildConfig {
    const TYPE_NAME: &'static str = "BuildConfig";
    const RULES: &'static [FieldRule<Self>] = rules![BuildConfig;
        "local" => Rule::OneOf("executionEnvironment"), local;
        "googleCloudBuild" => Rule::OneOf("executionEnvironment"), google_cloud_build;
        "cluster" => Rule::OneOf("executionEnvironment"), cluster;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate_each(&self.artifacts)?;
        validator.validate(&self.tag_policy)?;
        validator.validate_opt(self.google_cloud_build.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubectl: Option<KubectlDeploy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helm: Option<HelmDeploy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kustomize: Option<KustomizeDeploy>,
}

impl Validate for DeployConfig {
    const TYPE_NAME: &'static str = "DeployConfig";
    const RULES: &'static [FieldRule<Self>] = rules![DeployConfig;
        "kubectl" => Rule::OneOf("deployType"), kubectl;
        "helm" => Rule::OneOf("deployType"), helm;
        "kustomize" => Rule::OneOf("deployType"), kustomize;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate_opt(self.helm.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelmDeploy {
    pub releases: Vec<HelmRelease>,
}

impl Validate for HelmDeploy {
    const TYPE_NAME: &'static str = "HelmDeploy";

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate_each(&self.releases)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelmRelease {
    pub name: String,
    pub chart_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values_files: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub set_values: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub wait: bool,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub recreate_pods: bool,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub skip_build_dependencies: bool,
}

impl Validate for HelmRelease {
    const TYPE_NAME: &'static str = "HelmRelease";
    const RULES: &'static [FieldRule<Self>] = rules![HelmRelease;
        "name" => Rule::Required, name;
        "chartPath" => Rule::SkipTrim, chart_path;
    ];
}

/// A resource whose port is forwarded to the local machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortForwardResource {
    pub resource_type: String,
    pub resource_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Container port, by number or by name.
    pub port: IntOrString,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub local_port: i32,
}

impl Validate for PortForwardResource {
    const TYPE_NAME: &'static str = "PortForwardResource";
    const RULES: &'static [FieldRule<Self>] = rules![PortForwardResource;
        "resourceType" => Rule::Required, resource_type;
        "resourceName" => Rule::Required, resource_name;
        "port" => Rule::Required, port;
    ];
}

/// Keys that exclude each other wherever they appear in a document.
///
/// Overlays use this to drop a base sibling when they pick another member,
/// e.g. a profile choosing `helm` removes the base `kubectl`.
pub fn exclusive_key_groups() -> Vec<Vec<&'static str>> {
    let mut groups = Vec::new();
    groups.extend(one_of_groups::<BuildConfig>());
    groups.extend(one_of_groups::<Artifact>());
    groups.extend(one_of_groups::<DeployConfig>());
    groups.extend(one_of_groups::<TagPolicy>());
    groups.extend(one_of_groups::<KanikoBuildContext>());
    groups
}
