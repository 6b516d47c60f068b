use std::time::Duration;

use thiserror::Error;

/// Failures inside a scaling probe. These never leave the probe: they are
/// logged and turned into an unavailable snapshot.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' exited with status {code:?}: {stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Failed to parse scaling response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("No fleet found for '{selector}'.")]
    FleetNotFound { selector: String },
    #[error("Probe timed out after {timeout:?}.")]
    Timeout {
        timeout: Duration,
        #[source]
        source: tokio::time::error::Elapsed,
    },
}
