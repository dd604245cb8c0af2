//! `skiff/v1beta1`
//!
//! Pushing is decided once for the local builder (`local.push`) instead of
//! per artifact.

mod upgrade;

pub use upgrade::upgrade;

pub use crate::schema::v1alpha1::{DeployConfig, HelmDeploy, HelmRelease, KanikoBuild};

use crate::Result;
use crate::rules;
use crate::schema::common::{
    BazelArtifact, DockerArtifact, GoogleCloudBuild, TagPolicy, TestCase,
};
use crate::validation::{FieldRule, Rule, Validate, Validator};
use serde::{Deserialize, Serialize};

pub const VERSION: &str = "skiff/v1beta1";

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
    /// Push images after building. Unset means "push unless the cluster is
    /// local".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push: Option<bool>,
    #[serde(rename = "useDockerCLI", skip_serializing_if = "crate::schema::is_default")]
    pub use_docker_cli: bool,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub use_buildkit: bool,
}
