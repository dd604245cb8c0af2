//! Local cluster detection
//!
//! Images built for a local cluster can be loaded straight into its runtime
//! instead of being pushed to a registry. Whether a cluster is local is
//! decided, in priority order, by:
//!
//! 1. an explicit minikube profile request,
//! 2. `local-cluster` in the resolved context config,
//! 3. well-known context names,
//! 4. an optional [`LocalClusterProbe`],
//! 5. otherwise remote.

use super::global::ContextConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterType {
    Minikube,
    DockerDesktop,
    Kind,
    K3d,
    Microk8s,
    Other,
}

impl ClusterType {
    /// Detect the cluster type from a kube-context name alone.
    pub fn from_context_name(name: &str) -> Self {
        match name {
            "minikube" => Self::Minikube,
            "docker-desktop" | "docker-for-desktop" => Self::DockerDesktop,
            _ if name.ends_with("-kind") || name.starts_with("kind-") => Self::Kind,
            _ if name.starts_with("k3d-") => Self::K3d,
            _ if name.starts_with("microk8s-") => Self::Microk8s,
            _ => Self::Other,
        }
    }

    pub fn is_well_known_local(self) -> bool {
        self != Self::Other
    }

    /// Whether loading images into this cluster type was switched off.
    pub fn load_disabled(self, config: &ContextConfig) -> bool {
        match self {
            Self::Kind => config.kind_disable_load == Some(true),
            Self::K3d => config.k3d_disable_load == Some(true),
            _ => false,
        }
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Minikube => "minikube",
            Self::DockerDesktop => "docker-desktop",
            Self::Kind => "kind",
            Self::K3d => "k3d",
            Self::Microk8s => "microk8s",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Live detection of local clusters that have no recognizable name, e.g. a
/// minikube profile with a custom context name.
pub trait LocalClusterProbe {
    /// `Some(type)` if the context points at a local cluster.
    fn detect(&self, context_name: &str) -> Option<ClusterType>;
}

/// How images reach a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterDecision {
    pub cluster_type: ClusterType,
    pub local: bool,
    pub load_images: bool,
    pub push_images: bool,
}

impl ClusterDecision {
    fn new(cluster_type: ClusterType, local: bool, config: &ContextConfig) -> Self {
        let disabled = cluster_type.load_disabled(config);
        Self {
            cluster_type,
            local,
            load_images: local && !disabled,
            push_images: !local || disabled,
        }
    }
}

#[derive(Default)]
pub struct ClassifyOptions<'a> {
    /// Minikube profile requested on the command line.
    pub minikube_profile: Option<&'a str>,
    pub probe: Option<&'a dyn LocalClusterProbe>,
}

/// Decide whether `context_name` is a local cluster and how images get there.
pub fn classify(
    context_name: &str,
    config: &ContextConfig,
    options: &ClassifyOptions<'_>,
) -> ClusterDecision {
    let by_name = ClusterType::from_context_name(context_name);

    if let Some(profile) = options.minikube_profile.filter(|p| !p.is_empty()) {
        tracing::debug!(profile, "Minikube profile requested, cluster is local");
        return ClusterDecision::new(ClusterType::Minikube, true, config);
    }

    if let Some(local) = config.local_cluster {
        tracing::debug!(context = context_name, local, "Using local-cluster from config");
        return ClusterDecision::new(by_name, local, config);
    }

    if by_name.is_well_known_local() {
        return ClusterDecision::new(by_name, true, config);
    }

    if let Some(detected) = options.probe.and_then(|probe| probe.detect(context_name)) {
        tracing::debug!(
            context = context_name,
            cluster = %detected,
            "Probe detected local cluster"
        );
        return ClusterDecision::new(detected, true, config);
    }

    ClusterDecision::new(ClusterType::Other, false, config)
}
