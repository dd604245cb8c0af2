//! `skiff/v1beta2` → `skiff/v1`
//!
//! Helm releases take a list of values files instead of a single path.
//! Everything else added in `skiff/v1` starts out empty.

use super::{Config, DeployConfig, HelmRelease, Profile};
use crate::Result;
use crate::schema::v1;

pub fn upgrade(config: &Config) -> Result<v1::Config> {
    Ok(v1::Config {
        api_version: v1::VERSION.to_string(),
        kind: config.kind.clone(),
        build: upgrade_build(&config.build),
        test: config.test.clone(),
        deploy: upgrade_deploy(&config.deploy),
        port_forward: Vec::new(),
        profiles: config.profiles.iter().map(upgrade_profile).collect(),
    })
}

fn upgrade_profile(profile: &Profile) -> v1::Profile {
    v1::Profile {
        name: profile.name.clone(),
        build: upgrade_build(&profile.build),
        test: profile.test.clone(),
        deploy: upgrade_deploy(&profile.deploy),
        activation: Vec::new(),
    }
}

fn upgrade_build(build: &super::BuildConfig) -> v1::BuildConfig {
    v1::BuildConfig {
        artifacts: build.artifacts.clone(),
        insecure_registries: Vec::new(),
        tag_policy: build.tag_policy.clone(),
        local: build.local.clone(),
        google_cloud_build: build.google_cloud_build.clone(),
        cluster: build.cluster.clone(),
    }
}

fn upgrade_deploy(deploy: &DeployConfig) -> v1::DeployConfig {
    v1::DeployConfig {
        kubectl: deploy.kubectl.clone(),
        helm: deploy.helm.as_ref().map(|helm| v1::HelmDeploy {
            releases: helm.releases.iter().map(upgrade_release).collect(),
        }),
        kustomize: deploy.kustomize.clone(),
    }
}

fn upgrade_release(release: &HelmRelease) -> v1::HelmRelease {
    let values_files = match release.values_file_path.as_str() {
        "" => Vec::new(),
        path => vec![path.to_string()],
    };

    v1::HelmRelease {
        name: release.name.clone(),
        chart_path: release.chart_path.clone(),
        values_files,
        values: release.values.clone(),
        namespace: release.namespace.clone(),
        version: release.version.clone(),
        set_values: release.set_values.clone(),
        wait: release.wait,
        recreate_pods: release.recreate_pods,
        skip_build_dependencies: release.skip_build_dependencies,
    }
}
