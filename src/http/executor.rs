use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::time::Instant;
use url::Url;

use crate::metrics::{OutcomeClass, RequestOutcome};

/// Performs one request and classifies it. Implementations never fail: every
/// failure mode is encoded in the returned outcome.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self) -> RequestOutcome;
}

/// GETs a fixed target with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    target: Url,
    timeout: Duration,
}

impl HttpExecutor {
    #[must_use]
    pub const fn new(client: Client, target: Url, timeout: Duration) -> Self {
        Self {
            client,
            target,
            timeout,
        }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self) -> RequestOutcome {
        execute_request(&self.client, &self.target, self.timeout).await
    }
}

/// Issues a single GET against `target`, draining the body within `timeout`.
///
/// No logging and no shared state: the caller decides what to do with the
/// outcome.
pub async fn execute_request(client: &Client, target: &Url, timeout: Duration) -> RequestOutcome {
    let started_at = Instant::now();
    let response = match client.get(target.clone()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(err) => return RequestOutcome::new(started_at, classify_error(&err), None),
    };

    let status = response.status().as_u16();
    match drain_response_body(response).await {
        Ok(()) => RequestOutcome::new(started_at, OutcomeClass::from_status(status), Some(status)),
        Err(err) => RequestOutcome::new(started_at, classify_error(&err), Some(status)),
    }
}

fn classify_error(err: &reqwest::Error) -> OutcomeClass {
    if err.is_timeout() {
        OutcomeClass::Timeout
    } else {
        OutcomeClass::TransportError
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<(), reqwest::Error> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        chunk?;
    }
    Ok(())
}
