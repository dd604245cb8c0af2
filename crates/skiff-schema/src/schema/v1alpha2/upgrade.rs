//! `skiff/v1alpha2` → `skiff/v1beta1`
//!
//! Per-artifact `skipPush` collapses into one `local.push` flag. The new
//! value is computed from the old artifacts first, the old field is then
//! cleared from every artifact before the rest is carried over, and the
//! computed flag is injected into the new local builder last.

use super::{Artifact, BuildConfig, Config, Profile};
use crate::Result;
use crate::schema::v1beta1;

pub fn upgrade(config: &Config) -> Result<v1beta1::Config> {
    Ok(v1beta1::Config {
        api_version: v1beta1::VERSION.to_string(),
        kind: config.kind.clone(),
        build: upgrade_build(&config.build),
        test: config.test.clone(),
        deploy: config.deploy.clone(),
        profiles: config.profiles.iter().map(upgrade_profile).collect(),
    })
}

fn upgrade_profile(profile: &Profile) -> v1beta1::Profile {
    v1beta1::Profile {
        name: profile.name.clone(),
        build: upgrade_build(&profile.build),
        test: profile.test.clone(),
        deploy: profile.deploy.clone(),
    }
}

fn upgrade_build(build: &BuildConfig) -> v1beta1::BuildConfig {
    let skip_push = build.artifacts.iter().any(|a| a.skip_push);

    let mut local = build.local.as_ref().map(|local| v1beta1::LocalBuild {
        push: None,
        use_docker_cli: local.use_docker_cli,
        use_buildkit: local.use_buildkit,
    });

    if skip_push {
        if build.google_cloud_build.is_some() || build.kaniko.is_some() {
            tracing::debug!("Dropping skipPush: remote builders always push");
        } else {
            local.get_or_insert_with(Default::default).push = Some(false);
        }
    }

    v1beta1::BuildConfig {
        artifacts: build.artifacts.iter().map(upgrade_artifact).collect(),
        tag_policy: build.tag_policy.clone(),
        local,
        google_cloud_build: build.google_cloud_build.clone(),
        kaniko: build.kaniko.clone(),
    }
}

fn upgrade_artifact(artifact: &Artifact) -> v1beta1::Artifact {
    v1beta1::Artifact {
        image: artifact.image.clone(),
        context: artifact.context.clone(),
        docker: artifact.docker.clone(),
        bazel: artifact.bazel.clone(),
    }
}
