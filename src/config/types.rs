use serde::Deserialize;

use crate::args::TestMode;

/// On-disk configuration. Every field is optional; command-line flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub region: Option<String>,
    pub concurrency: Option<usize>,
    pub duration: Option<u64>,
    pub ramp_up: Option<u64>,
    pub fleet: Option<String>,
    pub mode: Option<TestMode>,
    pub steps: Option<usize>,
    pub delay_ms: Option<u64>,
    pub timeout: Option<u64>,
    pub report_interval: Option<u64>,
    pub probe_timeout: Option<u64>,
    pub project: Option<String>,
    pub no_probe: Option<bool>,
}
