use async_trait::async_trait;

use super::{ScalingSnapshot, ScalingStateProbe};

/// Stand-in used when no cloud CLI is available or probing is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProbe;

#[async_trait]
impl ScalingStateProbe for DisabledProbe {
    async fn sample(&self, _fleet: Option<&str>) -> ScalingSnapshot {
        ScalingSnapshot::Unavailable
    }
}
