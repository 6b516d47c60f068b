use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use hdrhistogram::Histogram;
use tracing::debug;

use super::types::{AggregateStats, LatencyPercentiles, RequestOutcome};

/// Highest latency tracked by the percentile histogram (one hour, in µs).
const HISTOGRAM_MAX_MICROS: u64 = 3_600_000_000;
const HISTOGRAM_SIGFIG: u8 = 3;

/// Shared accumulator every worker records into.
///
/// All state sits behind one lock so a snapshot never sees half of an outcome.
/// Callers never lock it themselves.
#[derive(Debug)]
pub struct MetricsAggregator {
    state: Mutex<AggregateState>,
}

#[derive(Debug, Clone)]
struct AggregateState {
    stats: AggregateStats,
    histogram: Option<Histogram<u64>>,
}

impl AggregateState {
    fn new() -> Self {
        let histogram =
            Histogram::<u64>::new_with_bounds(1, HISTOGRAM_MAX_MICROS, HISTOGRAM_SIGFIG)
                .map_err(|err| debug!("Latency histogram unavailable: {}", err))
                .ok();
        Self {
            stats: AggregateStats::default(),
            histogram,
        }
    }

    fn record(&mut self, outcome: &RequestOutcome) {
        self.stats.record(outcome);
        if let Some(histogram) = self.histogram.as_mut() {
            histogram.saturating_record(latency_micros(outcome.latency));
        }
    }

    fn merge(&mut self, other: &AggregateState) {
        self.stats.merge(&other.stats);
        if let (Some(histogram), Some(other_histogram)) =
            (self.histogram.as_mut(), other.histogram.as_ref())
            && let Err(err) = histogram.add(other_histogram)
        {
            debug!("Failed to merge latency histogram: {}", err);
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AggregateState::new()),
        }
    }

    /// Records one outcome. Safe to call from any number of workers at once.
    pub fn record(&self, outcome: &RequestOutcome) {
        self.lock().record(outcome);
    }

    /// Folds every outcome recorded by `other` into this aggregator.
    pub fn merge_from(&self, other: &MetricsAggregator) {
        let incoming = other.lock().clone();
        self.lock().merge(&incoming);
    }

    /// Point-in-time copy of the running totals.
    #[must_use]
    pub fn snapshot(&self) -> AggregateStats {
        self.lock().stats
    }

    #[must_use]
    pub fn percentiles(&self) -> LatencyPercentiles {
        let state = self.lock();
        let Some(histogram) = state.histogram.as_ref() else {
            return LatencyPercentiles::default();
        };
        if histogram.is_empty() {
            return LatencyPercentiles::default();
        }
        LatencyPercentiles {
            p50: Duration::from_micros(histogram.value_at_quantile(0.5)),
            p90: Duration::from_micros(histogram.value_at_quantile(0.9)),
            p99: Duration::from_micros(histogram.value_at_quantile(0.99)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AggregateState> {
        // Every mutation completes under the lock, so a poisoned guard still
        // holds consistent totals.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn latency_micros(latency: Duration) -> u64 {
    u64::try_from(latency.as_micros()).unwrap_or(u64::MAX).max(1)
}
