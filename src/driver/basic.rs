use std::future::Future;
use std::pin::pin;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::info;

use crate::error::AppResult;
use crate::pool::{PoolReport, WorkerPool};

use super::PhaseContext;
use super::report::ProgressTick;

/// Drives `work` to completion, emitting a progress tick every report
/// interval until `deadline`.
pub(super) async fn with_progress_ticks<F, T>(
    ctx: &PhaseContext,
    phase: &str,
    work: F,
    deadline: Instant,
    ticks: &mut Vec<ProgressTick>,
) -> T
where
    F: Future<Output = T>,
{
    let mut work = pin!(work);
    let period = ctx.config.report_interval;
    let first = Instant::now().checked_add(period).unwrap_or(deadline);
    let mut ticker = interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            output = &mut work => return output,
            _ = ticker.tick() => {
                if Instant::now() >= deadline {
                    continue;
                }
                ticks.push(ctx.progress_tick(phase.to_owned(), deadline).await);
            }
        }
    }
}

/// Full concurrency from the first second until the test duration elapses.
pub(super) async fn run_basic(
    ctx: &PhaseContext,
    pool: WorkerPool,
    ticks: &mut Vec<ProgressTick>,
) -> AppResult<PoolReport> {
    let concurrency = ctx.config.concurrency.get();
    let deadline = ctx.deadline_after(ctx.config.duration);
    info!(
        "Starting basic run: {} workers for {}s",
        concurrency,
        ctx.config.duration.as_secs()
    );
    with_progress_ticks(ctx, "basic", pool.run(concurrency, deadline), deadline, ticks).await
}
