use async_trait::async_trait;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::pool::WorkerPool;
use crate::shutdown::{ShutdownReceiver, shutdown_requested, wait_for_shutdown};

use super::schedule::RampStep;

/// State of the ramp right after a step's workers were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    /// 1-based step number.
    pub index: usize,
    pub total_steps: usize,
    pub target_concurrency: usize,
    pub added_workers: usize,
    pub live_workers: usize,
    pub step_end: Instant,
}

/// Receives one callback per step while that step's load is running.
#[async_trait]
pub trait StepReporter: Send {
    async fn on_step(&mut self, progress: StepProgress);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampOutcome {
    pub steps_completed: usize,
    pub cancelled: bool,
}

/// Walks a ramp schedule, growing the pool at each step boundary.
///
/// Step `i + 1` never starts before step `i`'s time has fully elapsed. Step
/// boundaries are measured from the ramp start so reporting delays do not
/// accumulate drift.
#[derive(Debug, Clone)]
pub struct RampController {
    steps: Vec<RampStep>,
}

impl RampController {
    #[must_use]
    pub const fn new(steps: Vec<RampStep>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[RampStep] {
        &self.steps
    }

    /// Drives `pool` through every step. Workers are spawned with
    /// `worker_deadline`, so they outlive the step that created them.
    pub async fn run(
        &self,
        pool: &mut WorkerPool,
        start: Instant,
        worker_deadline: Instant,
        shutdown_rx: &mut ShutdownReceiver,
        reporter: &mut dyn StepReporter,
    ) -> RampOutcome {
        let total_steps = self.steps.len();
        let mut step_end = start;
        let mut steps_completed = 0usize;

        for (position, step) in self.steps.iter().enumerate() {
            if shutdown_requested(shutdown_rx) {
                return RampOutcome {
                    steps_completed,
                    cancelled: true,
                };
            }

            step_end = step_end.checked_add(step.duration).unwrap_or(step_end);
            let added_workers = pool.grow_to(step.concurrency, worker_deadline);
            let progress = StepProgress {
                index: position.saturating_add(1),
                total_steps,
                target_concurrency: step.concurrency,
                added_workers,
                live_workers: pool.live_workers(),
                step_end,
            };
            if added_workers == 0 {
                debug!(
                    "Ramp step {}/{} adds no workers (target {})",
                    progress.index, total_steps, step.concurrency
                );
            } else {
                info!(
                    "Ramp step {}/{}: {} workers (+{})",
                    progress.index, total_steps, progress.live_workers, added_workers
                );
            }

            reporter.on_step(progress).await;

            tokio::select! {
                biased;
                () = wait_for_shutdown(shutdown_rx) => {
                    return RampOutcome {
                        steps_completed,
                        cancelled: true,
                    };
                }
                () = sleep_until(step_end) => {}
            }
            steps_completed = steps_completed.saturating_add(1);
        }

        RampOutcome {
            steps_completed,
            cancelled: false,
        }
    }
}
