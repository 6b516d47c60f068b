use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::{AppResult, HttpError};
use crate::metrics::OutcomeClass;

use super::executor::execute_request;

/// Sends one request and requires an exact `200 OK`.
///
/// This is stricter than the per-request success class (any 2xx/3xx): a
/// redirecting or `204` target is rejected before load starts.
///
/// # Errors
///
/// Returns a reachability error for any status other than 200, a timeout, or
/// a transport failure.
pub async fn check_reachability(client: &Client, target: &Url, timeout: Duration) -> AppResult<()> {
    debug!("Checking reachability of {} (timeout {:?})", target, timeout);
    let outcome = execute_request(client, target, timeout).await;
    match (outcome.class, outcome.status) {
        (OutcomeClass::Success, Some(200)) => {
            info!("Target {} reachable in {:?}", target, outcome.latency);
            Ok(())
        }
        (OutcomeClass::Success | OutcomeClass::HttpError, Some(status)) => {
            Err(HttpError::UnexpectedStatus {
                url: target.to_string(),
                status,
            }
            .into())
        }
        (OutcomeClass::Timeout, _) => Err(HttpError::ReachabilityTimeout {
            url: target.to_string(),
            timeout,
        }
        .into()),
        (OutcomeClass::TransportError | OutcomeClass::Success | OutcomeClass::HttpError, _) => {
            Err(HttpError::ReachabilityTransport {
                url: target.to_string(),
            }
            .into())
        }
    }
}
