use std::time::Duration;

use url::Url;

use crate::args::{PositiveUsize, TestMode, TesterArgs, normalize_target};
use crate::error::{AppResult, ValidationError};

/// Validated, read-only description of one load test.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub target: Url,
    /// Opaque label handed to the scaling probe.
    pub region: Option<String>,
    pub concurrency: PositiveUsize,
    pub duration: Duration,
    pub ramp_up: Duration,
    pub steps: PositiveUsize,
    pub fleet: Option<String>,
    pub project: String,
    pub request_timeout: Duration,
    /// Minimum spacing between two requests of the same worker.
    pub request_delay: Duration,
    pub report_interval: Duration,
    pub probe_timeout: Duration,
    pub no_probe: bool,
}

impl TestConfig {
    /// Builds the run configuration from merged CLI/config arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when the target cannot be turned into an http(s) URL.
    pub fn from_args(args: &TesterArgs) -> AppResult<Self> {
        let target = normalize_target(&args.target)?;
        Ok(Self {
            target,
            region: args.region.clone().filter(|value| !value.trim().is_empty()),
            concurrency: args.concurrency,
            duration: Duration::from_secs(args.duration.get()),
            ramp_up: Duration::from_secs(args.ramp_up),
            steps: args.steps,
            fleet: args.fleet.clone().filter(|value| !value.trim().is_empty()),
            project: args.project.clone(),
            request_timeout: Duration::from_secs(args.request_timeout.get()),
            request_delay: Duration::from_millis(args.delay_ms),
            report_interval: Duration::from_secs(args.report_interval.get()),
            probe_timeout: Duration::from_secs(args.probe_timeout.get()),
            no_probe: args.no_probe,
        })
    }

    /// Checks the invariants that depend on the selected mode.
    ///
    /// # Errors
    ///
    /// Returns an error when a ramp window is longer than the whole test, or
    /// when a pure ramp run has an empty window and so nothing to run.
    /// `combined` accepts an empty window and holds full concurrency.
    pub fn validate_for(&self, mode: TestMode) -> Result<(), ValidationError> {
        if !mode.uses_ramp() {
            return Ok(());
        }
        if mode == TestMode::Ramp && self.ramp_up.is_zero() {
            return Err(ValidationError::RampTooShort);
        }
        if self.ramp_up > self.duration {
            return Err(ValidationError::RampExceedsDuration {
                ramp_secs: self.ramp_up.as_secs(),
                duration_secs: self.duration.as_secs(),
            });
        }
        Ok(())
    }

    /// Duration of the load-generating part of `mode`.
    #[must_use]
    pub const fn run_length(&self, mode: TestMode) -> Duration {
        match mode {
            TestMode::Ramp => self.ramp_up,
            TestMode::Basic | TestMode::Combined | TestMode::Bench => self.duration,
        }
    }
}
