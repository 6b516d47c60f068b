//! Request outcomes and their thread-safe aggregation.
mod aggregator;
mod types;


pub use aggregator::MetricsAggregator;
pub use types::{AggregateStats, LatencyPercentiles, OutcomeClass, RequestOutcome};
