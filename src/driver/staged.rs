use async_trait::async_trait;
use tracing::{debug, info};

use crate::args::TestMode;
use crate::error::AppResult;
use crate::pool::WorkerPool;
use crate::ramp::{RampController, StepProgress, StepReporter, schedule};
use crate::shutdown::ShutdownReceiver;

use super::PhaseContext;
use super::basic::with_progress_ticks;
use super::report::ProgressTick;

/// Emits one progress tick per ramp step.
struct StepTicks<'run> {
    ctx: &'run PhaseContext,
    ticks: &'run mut Vec<ProgressTick>,
}

#[async_trait]
impl StepReporter for StepTicks<'_> {
    async fn on_step(&mut self, progress: StepProgress) {
        let phase = format!(
            "ramp step {}/{} ({} workers)",
            progress.index, progress.total_steps, progress.live_workers
        );
        let tick = self.ctx.progress_tick(phase, progress.step_end).await;
        self.ticks.push(tick);
    }
}

/// Ramp over the ramp window. `Combined` keeps the ramped workers alive and
/// holds full concurrency until the test duration elapses. Returns whether
/// the run was interrupted.
pub(super) async fn run_staged(
    ctx: &PhaseContext,
    mut pool: WorkerPool,
    mode: TestMode,
    shutdown_rx: &mut ShutdownReceiver,
    ticks: &mut Vec<ProgressTick>,
) -> AppResult<bool> {
    let config = &ctx.config;
    let ramp_end = ctx.deadline_after(config.ramp_up);
    let test_end = ctx.deadline_after(config.duration);
    let hold = mode == TestMode::Combined;
    let worker_deadline = if hold { test_end } else { ramp_end };

    if hold && config.ramp_up.is_zero() {
        info!(
            "No ramp window; holding {} workers for {}s",
            config.concurrency.get(),
            config.duration.as_secs()
        );
        pool.grow_to(config.concurrency.get(), test_end);
        let report = with_progress_ticks(ctx, "hold", pool.join(), test_end, ticks).await?;
        return Ok(report.cancelled());
    }

    let controller = RampController::new(schedule(
        config.concurrency.get(),
        config.ramp_up,
        config.steps.get(),
    ));
    info!(
        "Starting {} run: {} steps to {} workers over {}s",
        mode,
        controller.steps().len(),
        config.concurrency.get(),
        config.ramp_up.as_secs()
    );

    let outcome = {
        let mut reporter = StepTicks {
            ctx,
            ticks: &mut *ticks,
        };
        controller
            .run(&mut pool, ctx.start, worker_deadline, shutdown_rx, &mut reporter)
            .await
    };

    let report = if hold && !outcome.cancelled {
        info!(
            "Ramp complete; holding {} workers until {}s",
            pool.live_workers(),
            config.duration.as_secs()
        );
        with_progress_ticks(ctx, "hold", pool.join(), test_end, ticks).await?
    } else {
        pool.join().await?
    };

    debug!(
        "{} run joined {} workers after {} requests",
        mode,
        report.workers.len(),
        report.total_issued()
    );
    Ok(outcome.cancelled || report.cancelled())
}
