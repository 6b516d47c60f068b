use std::time::Duration;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("fleetload/", env!("CARGO_PKG_VERSION"));

/// Config filenames checked in the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["fleetload.toml", "fleetload.json"];

/// Timeout for the single pre-flight request, independent of `--timeout`.
pub(crate) const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP benchmarking binary that unlocks the advanced benchmark mode.
pub(crate) const BENCH_TOOL: &str = "ab";
/// Cloud CLI used by the scaling probe.
pub(crate) const CLOUD_CLI: &str = "aws";
