use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval, sleep_until};
use tracing::{debug, trace};

use crate::http::RequestExecutor;
use crate::metrics::MetricsAggregator;
use crate::shutdown::{ShutdownReceiver, shutdown_requested, wait_for_shutdown};

use super::{StopReason, WorkerReport};

pub(super) struct WorkerContext {
    pub(super) index: usize,
    pub(super) executor: Arc<dyn RequestExecutor>,
    pub(super) aggregator: Arc<MetricsAggregator>,
    pub(super) request_delay: Duration,
    pub(super) deadline: Instant,
}

/// Request loop of a single worker.
///
/// Requests start at most once per `request_delay`. The deadline and the
/// shutdown signal are checked at every iteration boundary; a request already
/// in flight is always completed and recorded.
pub(super) async fn run_worker(
    context: WorkerContext,
    mut shutdown_rx: ShutdownReceiver,
) -> WorkerReport {
    let mut pacing = build_pacing(context.request_delay);
    let mut issued: u64 = 0;

    let stop = loop {
        if Instant::now() >= context.deadline {
            break StopReason::Deadline;
        }
        if let Some(pacing) = pacing.as_mut() {
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_rx) => break StopReason::Cancelled,
                () = sleep_until(context.deadline) => break StopReason::Deadline,
                _ = pacing.tick() => {}
            }
            if Instant::now() >= context.deadline {
                break StopReason::Deadline;
            }
        } else {
            if shutdown_requested(&mut shutdown_rx) {
                break StopReason::Cancelled;
            }
            tokio::task::yield_now().await;
        }

        let outcome = context.executor.execute().await;
        context.aggregator.record(&outcome);
        issued = issued.saturating_add(1);
        trace!(
            "worker {} request {}: {:?} in {:?}",
            context.index, issued, outcome.class, outcome.latency
        );
    };

    debug!(
        "worker {} stopped ({:?}) after {} requests",
        context.index, stop, issued
    );
    WorkerReport {
        index: context.index,
        issued,
        stop,
    }
}

fn build_pacing(request_delay: Duration) -> Option<Interval> {
    if request_delay.is_zero() {
        return None;
    }
    let mut pacing = interval(request_delay);
    pacing.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(pacing)
}
