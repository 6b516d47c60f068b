use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::ProbeError;

use super::{FleetState, ScalingSnapshot, ScalingStateProbe};

const PROJECT_TAG: &str = "Project";
const LIVE_LIFECYCLE_STATE: &str = "InService";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeGroupsResponse {
    #[serde(default)]
    auto_scaling_groups: Vec<AutoScalingGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AutoScalingGroup {
    auto_scaling_group_name: String,
    #[serde(default)]
    desired_capacity: u32,
    #[serde(default)]
    instances: Vec<GroupInstance>,
    #[serde(default)]
    tags: Vec<GroupTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GroupInstance {
    #[serde(default)]
    lifecycle_state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GroupTag {
    key: String,
    #[serde(default)]
    value: String,
}

impl AutoScalingGroup {
    fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.key == key && tag.value == value)
    }

    fn into_state(self) -> FleetState {
        let live = self
            .instances
            .iter()
            .filter(|instance| instance.lifecycle_state == LIVE_LIFECYCLE_STATE)
            .count();
        FleetState {
            name: self.auto_scaling_group_name,
            desired: self.desired_capacity,
            live: u32::try_from(live).unwrap_or(u32::MAX),
        }
    }
}

/// Extracts one fleet from a `describe-auto-scaling-groups` JSON response.
///
/// With `fleet` set the group of that name is used; otherwise the first group
/// tagged `Project=<project>` is.
///
/// # Errors
///
/// Returns an error when the response is not valid JSON or no group matches.
pub fn parse_fleet(
    response: &[u8],
    fleet: Option<&str>,
    project: &str,
) -> Result<FleetState, ProbeError> {
    let parsed: DescribeGroupsResponse =
        serde_json::from_slice(response).map_err(|source| ProbeError::Parse { source })?;
    let found = match fleet {
        Some(name) => parsed
            .auto_scaling_groups
            .into_iter()
            .find(|group| group.auto_scaling_group_name == name),
        None => parsed
            .auto_scaling_groups
            .into_iter()
            .find(|group| group.has_tag(PROJECT_TAG, project)),
    };
    found
        .map(AutoScalingGroup::into_state)
        .ok_or_else(|| ProbeError::FleetNotFound {
            selector: fleet.map_or_else(|| format!("{}={}", PROJECT_TAG, project), str::to_owned),
        })
}

/// Reads auto scaling group state through the `aws` command line tool.
#[derive(Debug, Clone)]
pub struct AwsCliProbe {
    program: PathBuf,
    region: Option<String>,
    project: String,
    timeout: Duration,
}

impl AwsCliProbe {
    #[must_use]
    pub const fn new(
        program: PathBuf,
        region: Option<String>,
        project: String,
        timeout: Duration,
    ) -> Self {
        Self {
            program,
            region,
            project,
            timeout,
        }
    }

    fn command(&self, fleet: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args([
            "autoscaling",
            "describe-auto-scaling-groups",
            "--output",
            "json",
        ]);
        if let Some(region) = self.region.as_deref() {
            cmd.arg("--region").arg(region);
        }
        if let Some(name) = fleet {
            cmd.arg("--auto-scaling-group-names").arg(name);
        }
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    pub(super) async fn query(&self, fleet: Option<&str>) -> Result<FleetState, ProbeError> {
        let program = self.program.display().to_string();
        let output = tokio::time::timeout(self.timeout, self.command(fleet).output())
            .await
            .map_err(|source| ProbeError::Timeout {
                timeout: self.timeout,
                source,
            })?
            .map_err(|source| ProbeError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::NonZeroExit {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        parse_fleet(&output.stdout, fleet, &self.project)
    }
}

#[async_trait]
impl ScalingStateProbe for AwsCliProbe {
    async fn sample(&self, fleet: Option<&str>) -> ScalingSnapshot {
        match self.query(fleet).await {
            Ok(state) => ScalingSnapshot::Available(state),
            Err(err) => {
                debug!("Scaling probe unavailable: {}", err);
                ScalingSnapshot::Unavailable
            }
        }
    }
}
