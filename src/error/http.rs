use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Target {url} is not reachable: expected HTTP 200, got {status}.")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("Target {url} is not reachable: no response within {timeout:?}.")]
    ReachabilityTimeout { url: String, timeout: Duration },
    #[error("Target {url} is not reachable: connection failed.")]
    ReachabilityTransport { url: String },
}
