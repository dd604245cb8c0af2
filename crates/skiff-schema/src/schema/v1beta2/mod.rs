//! `skiff/v1beta2`
//!
//! The cluster builder is split in two: build settings move onto each
//! artifact (`artifacts[].kaniko`) and the pod settings move to a top-level
//! `build.cluster` block.

mod upgrade;

pub use upgrade::upgrade;

pub use crate::schema::v1alpha1::{DeployConfig, HelmDeploy, HelmRelease};
pub use crate::schema::v1beta1::LocalBuild;

use crate::Result;
use crate::rules;
use crate::schema::common::{
    BazelArtifact, DockerArtifact, GoogleCloudBuild, KanikoBuildContext, KanikoCache,
    TagPolicy, TestCase,
};
use crate::validation::{FieldRule, Rule, Validate, Validator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "skiff/v1beta2";

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
pub struct Artifact {
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker: Option<DockerArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bazel: Option<BazelArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kaniko: Option<KanikoArtifact>,
}

impl Validate for Artifact {
    const TYPE_NAME: &'static str = "Artifact";
    const RULES: &'static [FieldRule<Self>] = rules![Artifact;
        "image" => Rule::Required, image;
        "docker" => Rule::OneOf("artifact"), docker;
        "bazel" => Rule::OneOf("artifact"), bazel;
        "kaniko" => Rule::OneOf("artifact"), kaniko;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate_opt(self.bazel.as_ref())?;
        validator.validate_opt(self.kaniko.as_ref())
    }
}

/// Per-artifact settings for the in-cluster builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KanikoArtifact {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dockerfile: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub build_args: BTreeMap<String, String>,
    /// Multi-stage build target.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub build_context: KanikoBuildContext,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<KanikoCache>,
}

impl Validate for KanikoArtifact {
    const TYPE_NAME: &'static str = "KanikoArtifact";

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate(&self.build_context)
    }
}

/// Where in-cluster builds run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterDetails {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pull_secret_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pull_secret: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout: String,
}
