//! `skiff/v1alpha1`, the first pipeline schema.
//!
//! Omitting every deploy method means "deploy with kubectl".

mod upgrade;

pub use upgrade::upgrade;

use crate::Result;
use crate::rules;
use crate::schema::common::{
    BazelArtifact, DockerArtifact, GoogleCloudBuild, KanikoBuildContext, KanikoCache,
    KubectlDeploy, KustomizeDeploy, TagPolicy, TestCase,
};
use crate::validation::{FieldRule, Rule, Validate, Validator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "skiff/v1alpha1";

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
    pub profiles: Vec<Profile>,
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub tag_policy: TagPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalBuild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_cloud_build: Option<GoogleCloudBuild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kaniko: Option<KanikoBuild>,
}

impl Validate for BuildConfig {
    const TYPE_NAME: &'static str = "BuildConfig";
    const RULES: &'static [FieldRule<Self>] = rules![BuildConfig;
        "local" => Rule::OneOf("executionEnvironment"), local;
        "googleCloudBuild" => Rule::OneOf("executionEnvironment"), google_cloud_build;
        "kaniko" => Rule::OneOf("executionEnvironment"), kaniko;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate_each(&self.artifacts)?;
        validator.validate(&self.tag_policy)?;
        validator.validate_opt(self.google_cloud_build.as_ref())?;
        validator.validate_opt(self.kaniko.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artifact {
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub context: String,
    /// Do not push this image after building.
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub skip_push: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker: Option<DockerArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bazel: Option<BazelArtifact>,
}

impl Validate for Artifact {
    const TYPE_NAME: &'static str = "Artifact";
    const RULES: &'static [FieldRule<Self>] = rules![Artifact;
        "image" => Rule::Required, image;
        "docker" => Rule::OneOf("artifact"), docker;
        "bazel" => Rule::OneOf("artifact"), bazel;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate_opt(self.bazel.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalBuild {
    #[serde(rename = "useDockerCLI", skip_serializing_if = "crate::schema::is_default")]
    pub use_docker_cli: bool,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub use_buildkit: bool,
}

/// In-cluster builder block: where the context lives and how the build
/// pod runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KanikoBuild {
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub build_context: KanikoBuildContext,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pull_secret_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pull_secret: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<KanikoCache>,
}

impl Validate for KanikoBuild {
    const TYPE_NAME: &'static str = "KanikoBuild";

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate(&self.build_context)
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

impl DeployConfig {
    pub fn has_deployer(&self) -> bool {
        self.kubectl.is_some() || self.helm.is_some() || self.kustomize.is_some()
    }
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
    #[serde(skip_serializing_if = "String::is_empty")]
    pub values_file_path: String,
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
