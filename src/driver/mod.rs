//! Top-level orchestration: reachability check, mode run, summary.
mod basic;
mod bench;
mod mode;
mod report;
mod staged;
mod state;


use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::args::{REACHABILITY_TIMEOUT, TestMode};
use crate::capabilities::Capabilities;
use crate::config::TestConfig;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{HttpExecutor, build_client, check_reachability};
use crate::metrics::MetricsAggregator;
use crate::pool::WorkerPool;
use crate::probe::{ScalingStateProbe, probe_for, sample_within};
use crate::shutdown::{ShutdownReceiver, ShutdownSender, shutdown_requested};

pub use mode::{
    ModeSelection, available_modes, ensure_available, parse_selection, prompt_mode, write_menu,
};

use mode::{await_selection, read_stdin_line};
pub use report::{ProgressTick, RunReport, progress_line, stdout_supports_color, summary_lines};
pub use state::DriverState;

use report::{print_progress, print_summary};
use state::StateMachine;

/// Shared, read-only view handed to every run phase.
pub(crate) struct PhaseContext {
    config: Arc<TestConfig>,
    probe: Arc<dyn ScalingStateProbe>,
    aggregator: Arc<MetricsAggregator>,
    start: Instant,
    total: Duration,
    use_color: bool,
}

impl PhaseContext {
    fn deadline_after(&self, offset: Duration) -> Instant {
        self.start.checked_add(offset).unwrap_or(self.start)
    }

    /// Samples the probe without running past `phase_end`, then prints and
    /// returns the tick.
    async fn progress_tick(&self, phase: String, phase_end: Instant) -> ProgressTick {
        let budget = self
            .config
            .probe_timeout
            .min(phase_end.saturating_duration_since(Instant::now()));
        let snapshot =
            sample_within(self.probe.as_ref(), self.config.fleet.as_deref(), budget).await;
        let stats = self.aggregator.snapshot();
        let tick = ProgressTick {
            at: Local::now(),
            phase,
            elapsed: self.start.elapsed().min(self.total),
            total: self.total,
            requests: stats.requests,
            failures: stats.failures(),
            snapshot,
        };
        print_progress(&tick, self.use_color);
        tick
    }
}

/// Runs one load test from reachability check to summary. Single use.
pub struct TestDriver {
    config: Arc<TestConfig>,
    capabilities: Capabilities,
    probe: Arc<dyn ScalingStateProbe>,
    shutdown_tx: ShutdownSender,
    use_color: bool,
    state: StateMachine,
}

impl TestDriver {
    #[must_use]
    pub fn new(config: TestConfig, capabilities: Capabilities, shutdown_tx: &ShutdownSender) -> Self {
        let probe = probe_for(capabilities.cloud_cli.as_deref(), &config);
        Self {
            config: Arc::new(config),
            capabilities,
            probe,
            shutdown_tx: shutdown_tx.clone(),
            use_color: false,
            state: StateMachine::new(),
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn ScalingStateProbe>) -> Self {
        self.probe = probe;
        self
    }

    #[must_use]
    pub const fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state.current()
    }

    #[must_use]
    pub fn state_history(&self) -> &[DriverState] {
        self.state.history()
    }

    /// Runs the whole test once.
    ///
    /// # Errors
    ///
    /// Returns an error when the mode is invalid or unavailable, when the
    /// target fails the reachability check (no workers are started), when a
    /// shutdown arrives while the mode menu waits for an answer, or when the
    /// driver is run a second time.
    pub async fn run(&mut self, selection: ModeSelection) -> AppResult<RunReport> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if let ModeSelection::Fixed(mode) = selection {
            self.prepare(mode)?;
        }

        self.state.advance(DriverState::ReachabilityCheck)?;
        let client = build_client(self.config.request_timeout, self.config.concurrency.get())?;
        if let Err(err) = check_reachability(&client, &self.config.target, REACHABILITY_TIMEOUT).await
        {
            warn!("Aborting before any load is generated.");
            self.state.advance(DriverState::Aborted)?;
            return Err(err);
        }

        let mode = match selection {
            ModeSelection::Fixed(mode) => mode,
            ModeSelection::Interactive => {
                let available = available_modes(&self.capabilities);
                write_menu(&available, &mut std::io::stdout())?;
                let chosen = await_selection(read_stdin_line, &available, &mut shutdown_rx)
                    .await
                    .and_then(|mode| self.prepare(mode).map(|()| mode).map_err(AppError::from));
                match chosen {
                    Ok(mode) => mode,
                    Err(err) => {
                        warn!("No mode selected; aborting before any load is generated.");
                        self.state.advance(DriverState::Aborted)?;
                        return Err(err);
                    }
                }
            }
        };

        self.state.advance(if mode.uses_ramp() {
            DriverState::RampRun
        } else {
            DriverState::BasicRun
        })?;

        let aggregator = Arc::new(MetricsAggregator::new());
        let ctx = PhaseContext {
            config: Arc::clone(&self.config),
            probe: Arc::clone(&self.probe),
            aggregator: Arc::clone(&aggregator),
            start: Instant::now(),
            total: self.config.run_length(mode),
            use_color: self.use_color,
        };
        let mut ticks = Vec::new();
        let cancelled = self
            .run_phase(&ctx, mode, client, &mut shutdown_rx, &mut ticks)
            .await?;
        let elapsed = ctx.start.elapsed();

        self.state.advance(DriverState::Reporting)?;
        let final_snapshot = sample_within(
            self.probe.as_ref(),
            self.config.fleet.as_deref(),
            self.config.probe_timeout,
        )
        .await;
        let report = RunReport {
            mode,
            elapsed,
            stats: aggregator.snapshot(),
            percentiles: aggregator.percentiles(),
            ticks,
            final_snapshot,
            cancelled,
        };
        print_summary(&report, self.use_color);
        self.state.advance(DriverState::Done)?;
        Ok(report)
    }

    fn prepare(&self, mode: TestMode) -> Result<(), ValidationError> {
        ensure_available(mode, &self.capabilities)?;
        self.config.validate_for(mode)
    }

    fn worker_pool(&self, ctx: &PhaseContext, client: reqwest::Client) -> WorkerPool {
        let executor = Arc::new(HttpExecutor::new(
            client,
            self.config.target.clone(),
            self.config.request_timeout,
        ));
        WorkerPool::new(
            executor,
            Arc::clone(&ctx.aggregator),
            self.config.request_delay,
            &self.shutdown_tx,
        )
    }

    /// Returns whether the run was interrupted.
    async fn run_phase(
        &self,
        ctx: &PhaseContext,
        mode: TestMode,
        client: reqwest::Client,
        shutdown_rx: &mut ShutdownReceiver,
        ticks: &mut Vec<ProgressTick>,
    ) -> AppResult<bool> {
        let cancelled = if mode == TestMode::Bench {
            if shutdown_requested(shutdown_rx) {
                warn!("Shutdown requested before load started; skipping the run.");
                return Ok(true);
            }
            let Some(program) = self.capabilities.bench_tool.as_deref() else {
                return Err(AppError::validation(mode::bench_unavailable()));
            };
            let deadline = ctx.deadline_after(self.config.duration);
            basic::with_progress_ticks(
                ctx,
                "bench",
                bench::run_bench(program, &self.config, &ctx.aggregator, shutdown_rx),
                deadline,
                ticks,
            )
            .await?
        } else {
            // Created before the check: a signal landing after it is queued
            // for the pool and stops growth.
            let pool = self.worker_pool(ctx, client);
            if shutdown_requested(shutdown_rx) {
                warn!("Shutdown requested before load started; skipping the run.");
                return Ok(true);
            }
            if mode.uses_ramp() {
                staged::run_staged(ctx, pool, mode, shutdown_rx, ticks).await?
            } else {
                basic::run_basic(ctx, pool, ticks).await?.cancelled()
            }
        };
        if cancelled {
            info!("Run interrupted; reporting what was recorded.");
        }
        Ok(cancelled)
    }
}
