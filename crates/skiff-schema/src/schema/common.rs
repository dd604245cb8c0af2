//! Section types shared unchanged by every schema version.

use crate::Result;
use crate::rules;
use crate::validation::{FieldRule, Rule, Validate, Validator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How built images are tagged. At most one tagger may be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<GitTagger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<ShaTagger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_template: Option<EnvTemplateTagger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTimeTagger>,
}

impl Validate for TagPolicy {
    const TYPE_NAME: &'static str = "TagPolicy";
    const RULES: &'static [FieldRule<Self>] = rules![TagPolicy;
        "gitCommit" => Rule::OneOf("tag"), git_commit;
        "sha256" => Rule::OneOf("tag"), sha256;
        "envTemplate" => Rule::OneOf("tag"), env_template;
        "dateTime" => Rule::OneOf("tag"), date_time;
    ];

    fn validate_children(&self, validator: &mut Validator) -> Result<()> {
        validator.validate_opt(self.env_template.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitTagger {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShaTagger {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvTemplateTagger {
    pub template: String,
}

impl Validate for EnvTemplateTagger {
    const TYPE_NAME: &'static str = "EnvTemplateTagger";
    const RULES: &'static [FieldRule<Self>] = rules![EnvTemplateTagger;
        "template" => Rule::Required, template;
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateTimeTagger {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timezone: String,
}

/// Build an artifact with a local Dockerfile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockerArtifact {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dockerfile: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub build_args: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cache_from: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BazelArtifact {
    pub target: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Validate for BazelArtifact {
    const TYPE_NAME: &'static str = "BazelArtifact";
    const RULES: &'static [FieldRule<Self>] = rules![BazelArtifact;
        "target" => Rule::Required, target;
    ];
}

/// Build on Google Cloud Build instead of the local daemon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoogleCloudBuild {
    pub project_id: String,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub disk_size_gb: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub machine_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_image: String,
}

impl Validate for GoogleCloudBuild {
    const TYPE_NAME: &'static str = "GoogleCloudBuild";
    const RULES: &'static [FieldRule<Self>] = rules![GoogleCloudBuild;
        "projectId" => Rule::Required, project_id;
    ];
}

/// Where a cluster-side builder reads the build context from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KanikoBuildContext {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gcs_bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_dir: Option<LocalDir>,
}

impl Validate for KanikoBuildContext {
    const TYPE_NAME: &'static str = "KanikoBuildContext";
    const RULES: &'static [FieldRule<Self>] = rules![KanikoBuildContext;
        "gcsBucket" => Rule::OneOf("buildContext"), gcs_bucket;
        "localDir" => Rule::OneOf("buildContext"), local_dir;
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalDir {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub init_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KanikoCache {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestCase {
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub structure_tests: Vec<String>,
}

impl Validate for TestCase {
    const TYPE_NAME: &'static str = "TestCase";
    const RULES: &'static [FieldRule<Self>] = rules![TestCase;
        "image" => Rule::Required, image;
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KubectlDeploy {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remote_manifests: Vec<String>,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub flags: KubectlFlags,
}

/// Extra arguments passed to kubectl invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KubectlFlags {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apply: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KustomizeDeploy {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "crate::schema::is_default")]
    pub flags: KubectlFlags,
}
