use std::time::Duration;

use tokio::time::Instant;

/// Classification of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    /// Any 2xx or 3xx response.
    Success,
    /// A 4xx or 5xx response (or any other non-success status).
    HttpError,
    /// No response within the request timeout.
    Timeout,
    /// DNS, connect, reset, or body read failures.
    TransportError,
}

impl OutcomeClass {
    /// Classifies a received status code; transport-level failures never reach here.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status >= 200 && status < 400 {
            OutcomeClass::Success
        } else {
            OutcomeClass::HttpError
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, OutcomeClass::Success)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestOutcome {
    pub class: OutcomeClass,
    /// Status code when a response arrived.
    pub status: Option<u16>,
    pub latency: Duration,
    pub started_at: Instant,
}

impl RequestOutcome {
    #[must_use]
    pub fn new(started_at: Instant, class: OutcomeClass, status: Option<u16>) -> Self {
        Self {
            class,
            status,
            latency: started_at.elapsed(),
            started_at,
        }
    }
}

/// Running totals over every recorded outcome.
///
/// Latency is kept as min/max/sum so memory stays constant however long the
/// run is. `merge` is commutative and associative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub requests: u64,
    pub successes: u64,
    pub http_errors: u64,
    pub timeouts: u64,
    pub transport_errors: u64,
    pub min_latency: Option<Duration>,
    pub max_latency: Option<Duration>,
    pub latency_sum: Duration,
}

impl AggregateStats {
    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.requests = self.requests.saturating_add(1);
        match outcome.class {
            OutcomeClass::Success => self.successes = self.successes.saturating_add(1),
            OutcomeClass::HttpError => self.http_errors = self.http_errors.saturating_add(1),
            OutcomeClass::Timeout => self.timeouts = self.timeouts.saturating_add(1),
            OutcomeClass::TransportError => {
                self.transport_errors = self.transport_errors.saturating_add(1);
            }
        }
        self.min_latency = Some(
            self.min_latency
                .map_or(outcome.latency, |min| min.min(outcome.latency)),
        );
        self.max_latency = Some(
            self.max_latency
                .map_or(outcome.latency, |max| max.max(outcome.latency)),
        );
        self.latency_sum = self.latency_sum.saturating_add(outcome.latency);
    }

    pub fn merge(&mut self, other: &AggregateStats) {
        self.requests = self.requests.saturating_add(other.requests);
        self.successes = self.successes.saturating_add(other.successes);
        self.http_errors = self.http_errors.saturating_add(other.http_errors);
        self.timeouts = self.timeouts.saturating_add(other.timeouts);
        self.transport_errors = self.transport_errors.saturating_add(other.transport_errors);
        self.min_latency = match (self.min_latency, other.min_latency) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (left, right) => left.or(right),
        };
        self.max_latency = match (self.max_latency, other.max_latency) {
            (Some(left), Some(right)) => Some(left.max(right)),
            (left, right) => left.or(right),
        };
        self.latency_sum = self.latency_sum.saturating_add(other.latency_sum);
    }

    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.http_errors
            .saturating_add(self.timeouts)
            .saturating_add(self.transport_errors)
    }

    #[must_use]
    pub fn mean_latency(&self) -> Option<Duration> {
        if self.requests == 0 {
            return None;
        }
        let mean_micros = self
            .latency_sum
            .as_micros()
            .checked_div(u128::from(self.requests))
            .unwrap_or(0);
        Some(Duration::from_micros(
            u64::try_from(mean_micros).unwrap_or(u64::MAX),
        ))
    }

    /// Success rate in hundredths of a percent (`9950` = 99.50%).
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.requests == 0 {
            return 0;
        }
        let scaled = u128::from(self.successes)
            .saturating_mul(10_000)
            .checked_div(u128::from(self.requests))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Requests per second over `elapsed`, in hundredths. `None` when nothing
    /// was measured.
    #[must_use]
    pub fn rps_x100(&self, elapsed: Duration) -> Option<u64> {
        let elapsed_ms = elapsed.as_millis();
        if elapsed_ms == 0 || self.requests == 0 {
            return None;
        }
        let scaled = u128::from(self.requests)
            .saturating_mul(100_000)
            .checked_div(elapsed_ms)
            .unwrap_or(0);
        Some(u64::try_from(scaled).unwrap_or(u64::MAX))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyPercentiles {
    pub p50: Duration,
    pub p90: Duration,
    pub p99: Duration,
}
