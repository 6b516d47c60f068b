//! Fleet scaling-state sampling used for progress correlation.
//!
//! A probe never fails the run: every problem is logged and reported as
//! [`ScalingSnapshot::Unavailable`].
mod aws;
mod disabled;


use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::TestConfig;

pub use aws::{AwsCliProbe, parse_fleet};
pub use disabled::DisabledProbe;

/// Capacity of one fleet at the moment it was sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetState {
    pub name: String,
    pub desired: u32,
    pub live: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalingSnapshot {
    Available(FleetState),
    Unavailable,
}

impl ScalingSnapshot {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Display for ScalingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(state) => write!(
                f,
                "{} desired={} live={}",
                state.name, state.desired, state.live
            ),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Read-only query against the control plane that owns the fleet.
///
/// `fleet` is the explicit fleet name; `None` asks the probe to discover one.
#[async_trait]
pub trait ScalingStateProbe: Send + Sync {
    async fn sample(&self, fleet: Option<&str>) -> ScalingSnapshot;
}

/// Samples `probe` but gives up after `timeout`.
pub async fn sample_within(
    probe: &dyn ScalingStateProbe,
    fleet: Option<&str>,
    timeout: Duration,
) -> ScalingSnapshot {
    if timeout.is_zero() {
        return ScalingSnapshot::Unavailable;
    }
    match tokio::time::timeout(timeout, probe.sample(fleet)).await {
        Ok(snapshot) => snapshot,
        Err(_) => {
            debug!("Scaling probe did not answer within {:?}", timeout);
            ScalingSnapshot::Unavailable
        }
    }
}

/// Picks the cloud-CLI probe when the CLI is installed and probing is enabled.
#[must_use]
pub fn probe_for(cloud_cli: Option<&Path>, config: &TestConfig) -> Arc<dyn ScalingStateProbe> {
    match cloud_cli {
        Some(program) if !config.no_probe => Arc::new(AwsCliProbe::new(
            program.to_path_buf(),
            config.region.clone(),
            config.project.clone(),
            config.probe_timeout,
        )),
        Some(_) => {
            debug!("Scaling probe disabled by configuration");
            Arc::new(DisabledProbe)
        }
        None => {
            debug!("Cloud CLI not found; scaling probe disabled");
            Arc::new(DisabledProbe)
        }
    }
}
