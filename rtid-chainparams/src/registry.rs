use std::sync::Arc;

use rtid_types::consensus::{Deployment, DeploymentPos};
use rtid_types::error::RtidError;
use rtid_types::network::NetworkId;
use tracing::{info, warn};

use crate::create_chain_params;
use crate::params::ChainParams;

/// Holder of the active network's parameters.
///
/// Owned by the embedding application and passed to whatever needs the
/// parameters; several registries can coexist, e.g. one per test. Readers
/// receive `Arc` snapshots, so a later re-selection or patch never changes a
/// snapshot already handed out.
///
/// The registry does no locking of its own. Select (and patch, if needed)
/// before sharing snapshots with other threads.
#[derive(Debug, Default, Clone)]
pub struct ParamsRegistry {
    active: Option<Arc<ChainParams>>,
}

impl ParamsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and activate the parameters of the network called `name`
    /// (`"main"`, `"test"` or `"regtest"`).
    ///
    /// Replaces any previous selection. On failure the previous selection
    /// stays active.
    pub fn select(&mut self, name: &str) -> Result<Arc<ChainParams>, RtidError> {
        let network: NetworkId = name.parse()?;
        self.select_network(network)
    }

    /// Like [`select`](Self::select) with an already-parsed network.
    pub fn select_network(&mut self, network: NetworkId) -> Result<Arc<ChainParams>, RtidError> {
        let params = Arc::new(create_chain_params(network)?);
        if let Some(previous) = &self.active {
            if previous.network != network {
                info!(
                    from = previous.network_id(),
                    to = network.as_str(),
                    "replacing selected chain parameters"
                );
            }
        }
        info!(
            network = network.as_str(),
            port = params.default_port,
            "selected chain parameters"
        );
        self.active = Some(Arc::clone(&params));
        Ok(params)
    }

    /// The active parameter set.
    pub fn active(&self) -> Result<&ChainParams, RtidError> {
        self.active.as_deref().ok_or(RtidError::UninitializedAccess)
    }

    /// A shared snapshot of the active parameter set.
    pub fn shared(&self) -> Result<Arc<ChainParams>, RtidError> {
        self.active.clone().ok_or(RtidError::UninitializedAccess)
    }

    pub fn is_selected(&self) -> bool {
        self.active.is_some()
    }

    /// Overwrite one deployment's activation window on the active set.
    ///
    /// Meant for test harnesses. Construction-time checks are not re-run and
    /// the deployment keeps its signaling bit. Snapshots taken before the
    /// patch keep the old window.
    pub fn patch_deployment(
        &mut self,
        pos: DeploymentPos,
        start_time: i64,
        timeout: i64,
    ) -> Result<(), RtidError> {
        let active = self.active.as_mut().ok_or(RtidError::UninitializedAccess)?;
        let params = Arc::make_mut(active);
        warn!(
            network = params.network_id(),
            deployment = pos.name(),
            start_time,
            timeout = %describe_timeout(timeout),
            "patching deployment window"
        );
        params.consensus.deployments.set_window(pos, start_time, timeout);
        Ok(())
    }
}

fn describe_timeout(timeout: i64) -> String {
    if timeout == Deployment::NO_TIMEOUT {
        "none".to_string()
    } else {
        timeout.to_string()
    }
}
