//! `skiff/v1alpha1` → `skiff/v1alpha2`
//!
//! v1alpha1 treated a deploy section with no method as "kubectl with the
//! default manifests". v1alpha2 requires that default to be spelled out, so
//! it is written into the base pipeline and into every profile on its own:
//! each profile is upgraded as an independent pipeline.

use super::{Config, DeployConfig};
use crate::Result;
use crate::schema::common::KubectlDeploy;
use crate::schema::v1alpha2;

/// Manifests kubectl deploys when the document names none.
pub const DEFAULT_KUBECTL_MANIFEST: &str = "k8s/*.yaml";

pub fn upgrade(config: &Config) -> Result<v1alpha2::Config> {
    let mut next = config.clone();
    next.api_version = v1alpha2::VERSION.to_string();

    materialize_default_deployer(&mut next.deploy);
    for profile in &mut next.profiles {
        materialize_default_deployer(&mut profile.deploy);
    }

    Ok(next)
}

fn materialize_default_deployer(deploy: &mut DeployConfig) {
    if !deploy.has_deployer() {
        deploy.kubectl = Some(KubectlDeploy {
            manifests: vec![DEFAULT_KUBECTL_MANIFEST.to_string()],
            ..Default::default()
        });
    }
}
