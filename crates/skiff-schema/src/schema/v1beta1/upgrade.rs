//! `skiff/v1beta1` → `skiff/v1beta2`
//!
//! The top-level `build.kaniko` block fans out to two places:
//!
//! - every artifact gets its own `kaniko` settings (context, flags, cache),
//!   taking over the Dockerfile path, build args, and target from its
//!   `docker` block;
//! - the pod settings (pull secret, namespace, timeout) become
//!   `build.cluster`.
//!
//! Bazel artifacts and `docker.cacheFrom` have no in-cluster equivalent and
//! fail the hop.

use super::{Artifact, BuildConfig, Config, KanikoBuild, Profile};
use crate::schema::v1beta2;
use crate::{Error, Result};

pub fn upgrade(config: &Config) -> Result<v1beta2::Config> {
    Ok(v1beta2::Config {
        api_version: v1beta2::VERSION.to_string(),
        kind: config.kind.clone(),
        build: upgrade_build(&config.build, "build")?,
        test: config.test.clone(),
        deploy: config.deploy.clone(),
        profiles: config
            .profiles
            .iter()
            .map(upgrade_profile)
            .collect::<Result<_>>()?,
    })
}

fn upgrade_profile(profile: &Profile) -> Result<v1beta2::Profile> {
    Ok(v1beta2::Profile {
        name: profile.name.clone(),
        build: upgrade_build(&profile.build, &format!("profiles.{}.build", profile.name))?,
        test: profile.test.clone(),
        deploy: profile.deploy.clone(),
    })
}

fn upgrade_build(build: &BuildConfig, location: &str) -> Result<v1beta2::BuildConfig> {
    let artifacts = build
        .artifacts
        .iter()
        .enumerate()
        .map(|(index, artifact)| match &build.kaniko {
            Some(kaniko) => {
                let location = format!("{location}.artifacts.{index}");
                kaniko_artifact(artifact, kaniko, &location)
            }
            None => Ok(plain_artifact(artifact)),
        })
        .collect::<Result<_>>()?;

    let cluster = build.kaniko.as_ref().map(|kaniko| v1beta2::ClusterDetails {
        pull_secret_name: kaniko.pull_secret_name.clone(),
        pull_secret: kaniko.pull_secret.clone(),
        namespace: kaniko.namespace.clone(),
        timeout: kaniko.timeout.clone(),
    });

    Ok(v1beta2::BuildConfig {
        artifacts,
        tag_policy: build.tag_policy.clone(),
        local: build.local.clone(),
        google_cloud_build: build.google_cloud_build.clone(),
        cluster,
    })
}

fn plain_artifact(artifact: &Artifact) -> v1beta2::Artifact {
    v1beta2::Artifact {
        image: artifact.image.clone(),
        context: artifact.context.clone(),
        docker: artifact.docker.clone(),
        bazel: artifact.bazel.clone(),
        kaniko: None,
    }
}

fn kaniko_artifact(
    artifact: &Artifact,
    kaniko: &KanikoBuild,
    location: &str,
) -> Result<v1beta2::Artifact> {
    if artifact.bazel.is_some() {
        return Err(Error::Incompatible {
            field: format!("{location}.bazel"),
            reason: format!(
                "artifact {} is built with bazel, which the cluster builder cannot run",
                artifact.image
            ),
        });
    }

    let docker = artifact.docker.clone().unwrap_or_default();
    // The cluster builder has its own layer cache and no equivalent.
    if !docker.cache_from.is_empty() {
        return Err(Error::Incompatible {
            field: format!("{location}.docker.cacheFrom"),
            reason: format!(
                "artifact {} uses cacheFrom, which the cluster builder does not support",
                artifact.image
            ),
        });
    }

    Ok(v1beta2::Artifact {
        image: artifact.image.clone(),
        context: artifact.context.clone(),
        docker: None,
        bazel: None,
        kaniko: Some(v1beta2::KanikoArtifact {
            dockerfile: docker.dockerfile,
            build_args: docker.build_args,
            target: docker.target,
            build_context: kaniko.build_context.clone(),
            flags: kaniko.flags.clone(),
            cache: kaniko.cache.clone(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::common::{BazelArtifact, DockerArtifact, KanikoBuildContext, KanikoCache};
    use pretty_assertions::assert_eq;

    fn kaniko() -> KanikoBuild {
        KanikoBuild {
            build_context: KanikoBuildContext {
                gcs_bucket: "bucket".into(),
                ..Default::default()
            },
            pull_secret_name: "kaniko-secret".into(),
            namespace: "builds".into(),
            timeout: "20m".into(),
            flags: vec!["--verbosity=debug".into()],
            cache: Some(KanikoCache {
                repo: "gcr.io/p/cache".into(),
            }),
            ..Default::default()
        }
    }

    fn docker_artifact(image: &str, dockerfile: &str) -> Artifact {
        Artifact {
            image: image.into(),
            docker: Some(DockerArtifact {
                dockerfile: dockerfile.into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn config(build: BuildConfig) -> Config {
        Config {
            api_version: crate::schema::v1beta1::VERSION.into(),
            build,
            ..Default::default()
        }
    }

    #[test]
    fn test_kaniko_block_fans_out_to_artifacts_and_cluster() {
        let input = config(BuildConfig {
            artifacts: vec![
                docker_artifact("app", "Dockerfile.app"),
                Artifact {
                    image: "worker".into(),
                    ..Default::default()
                },
            ],
            kaniko: Some(kaniko()),
            ..Default::default()
        });

        let next = upgrade(&input).unwrap();

        assert_eq!(next.api_version, v1beta2::VERSION);
        let cluster = next.build.cluster.unwrap();
        assert_eq!(cluster.pull_secret_name, "kaniko-secret");
        assert_eq!(cluster.namespace, "builds");
        assert_eq!(cluster.timeout, "20m");

        for artifact in &next.build.artifacts {
            let settings = artifact.kaniko.as_ref().unwrap();
            assert_eq!(settings.build_context.gcs_bucket, "bucket");
            assert_eq!(settings.flags, vec!["--verbosity=debug"]);
            assert_eq!(settings.cache.as_ref().unwrap().repo, "gcr.io/p/cache");
            assert!(artifact.docker.is_none());
        }
        assert_eq!(
            next.build.artifacts[0].kaniko.as_ref().unwrap().dockerfile,
            "Dockerfile.app"
        );
        assert_eq!(next.build.artifacts[1].kaniko.as_ref().unwrap().dockerfile, "");
    }

    #[test]
    fn test_without_kaniko_artifacts_are_carried_over() {
        let input = config(BuildConfig {
            artifacts: vec![docker_artifact("app", "Dockerfile")],
            ..Default::default()
        });

        let next = upgrade(&input).unwrap();

        assert!(next.build.cluster.is_none());
        assert!(next.build.artifacts[0].kaniko.is_none());
        assert_eq!(
            next.build.artifacts[0].docker.as_ref().unwrap().dockerfile,
            "Dockerfile"
        );
    }

    #[test]
    fn test_docker_settings_move_into_kaniko() {
        let input = config(BuildConfig {
            artifacts: vec![Artifact {
                image: "app".into(),
                docker: Some(DockerArtifact {
                    dockerfile: "Dockerfile".into(),
                    target: "prod".into(),
                    build_args: [("VERSION".to_string(), "1.2".to_string())].into(),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            kaniko: Some(kaniko()),
            ..Default::default()
        });

        let next = upgrade(&input).unwrap();

        let settings = next.build.artifacts[0].kaniko.as_ref().unwrap();
        assert_eq!(settings.dockerfile, "Dockerfile");
        assert_eq!(settings.target, "prod");
        assert_eq!(settings.build_args.get("VERSION").map(String::as_str), Some("1.2"));
    }

    #[test]
    fn test_cache_from_cannot_move_to_cluster_builder() {
        let input = config(BuildConfig {
            artifacts: vec![Artifact {
                image: "app".into(),
                docker: Some(DockerArtifact {
                    cache_from: vec!["gcr.io/p/app:latest".into()],
                    ..Default::default()
                }),
                ..Default::default()
            }],
            kaniko: Some(kaniko()),
            ..Default::default()
        });

        match upgrade(&input).unwrap_err() {
            Error::Incompatible { field, .. } => {
                assert_eq!(field, "build.artifacts.0.docker.cacheFrom")
            }
            other => panic!("expected Incompatible, got {other:?}"),
        }
    }

    #[test]
    fn test_bazel_artifact_cannot_move_to_cluster_builder() {
        let input = config(BuildConfig {
            artifacts: vec![Artifact {
                image: "bz".into(),
                bazel: Some(BazelArtifact {
                    target: "//:image.tar".into(),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            kaniko: Some(kaniko()),
            ..Default::default()
        });

        match upgrade(&input).unwrap_err() {
            Error::Incompatible { field, .. } => assert_eq!(field, "build.artifacts.0.bazel"),
            other => panic!("expected Incompatible, got {other:?}"),
        }
    }

    #[test]
    fn test_profile_builds_fan_out_too() {
        let mut input = config(BuildConfig::default());
        input.profiles = vec![Profile {
            name: "gke".into(),
            build: BuildConfig {
                artifacts: vec![docker_artifact("app", "Dockerfile")],
                kaniko: Some(kaniko()),
                ..Default::default()
            },
            ..Default::default()
        }];

        let next = upgrade(&input).unwrap();

        assert!(next.build.cluster.is_none());
        let profile = &next.profiles[0];
        assert!(profile.build.cluster.is_some());
        assert!(profile.build.artifacts[0].kaniko.is_some());
    }
}
