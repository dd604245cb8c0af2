//! `skiff/v1alpha2`
//!
//! Same document shape as v1alpha1; the difference is in meaning: a deploy
//! method is always written out, never implied.

mod upgrade;

pub use upgrade::upgrade;

pub use crate::schema::v1alpha1::{
    Artifact, BuildConfig, Config, DeployConfig, HelmDeploy, HelmRelease, KanikoBuild,
    LocalBuild, Profile,
};

pub const VERSION: &str = "skiff/v1alpha2";
