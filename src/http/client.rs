use std::time::Duration;

use reqwest::{Client, redirect};

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};

/// How long an idle keep-alive connection stays pooled.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared client used by every worker.
///
/// Redirects are not followed so a 3xx is observed and classified as-is.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(request_timeout: Duration, max_idle_per_host: usize) -> AppResult<Client> {
    Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .redirect(redirect::Policy::none())
        .timeout(request_timeout)
        .connect_timeout(request_timeout)
        .pool_max_idle_per_host(max_idle_per_host)
        .pool_idle_timeout(Some(POOL_IDLE_TIMEOUT))
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
