use std::io::IsTerminal;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::style::{Color, Stylize};

use crate::args::TestMode;
use crate::metrics::{AggregateStats, LatencyPercentiles};
use crate::probe::ScalingSnapshot;

const PERCENT_DIVISOR: u64 = 100;
const US_PER_MS: u128 = 1_000;

/// One progress line as emitted during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTick {
    pub at: DateTime<Local>,
    pub phase: String,
    pub elapsed: Duration,
    pub total: Duration,
    pub requests: u64,
    pub failures: u64,
    pub snapshot: ScalingSnapshot,
}

impl ProgressTick {
    /// Whole-percent progress, clamped to 100.
    #[must_use]
    pub fn percent(&self) -> u64 {
        let total_ms = self.total.as_millis();
        if total_ms == 0 {
            return PERCENT_DIVISOR;
        }
        let scaled = self
            .elapsed
            .as_millis()
            .saturating_mul(u128::from(PERCENT_DIVISOR))
            .checked_div(total_ms)
            .unwrap_or(0);
        u64::try_from(scaled)
            .unwrap_or(PERCENT_DIVISOR)
            .min(PERCENT_DIVISOR)
    }
}

/// Everything the driver knows once a run is over.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: TestMode,
    pub elapsed: Duration,
    pub stats: AggregateStats,
    pub percentiles: LatencyPercentiles,
    pub ticks: Vec<ProgressTick>,
    pub final_snapshot: ScalingSnapshot,
    pub cancelled: bool,
}

#[must_use]
pub fn progress_line(tick: &ProgressTick) -> String {
    format!(
        "[{}] {} {}s/{}s ({}%) | requests {} | failures {} | fleet {}",
        tick.at.format("%H:%M:%S"),
        tick.phase,
        tick.elapsed.as_secs(),
        tick.total.as_secs(),
        tick.percent(),
        tick.requests,
        tick.failures,
        tick.snapshot
    )
}

pub(crate) fn print_progress(tick: &ProgressTick, use_color: bool) {
    let line = progress_line(tick);
    if use_color && !tick.snapshot.is_available() {
        println!("{}", line.with(Color::DarkYellow));
    } else {
        println!("{line}");
    }
}

#[must_use]
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let stats = &report.stats;
    let success_rate_x100 = stats.success_rate_x100();
    let mut lines = Vec::new();
    lines.push(format!("Mode: {}", report.mode));
    lines.push(format!(
        "Duration: {}.{:02}s{}",
        report.elapsed.as_secs(),
        report.elapsed.subsec_millis().checked_div(10).unwrap_or(0),
        if report.cancelled { " (interrupted)" } else { "" }
    ));
    lines.push(format!("Total Requests: {}", stats.requests));
    lines.push(format!(
        "Successful: {} ({}.{:02}%)",
        stats.successes,
        success_rate_x100 / PERCENT_DIVISOR,
        success_rate_x100 % PERCENT_DIVISOR
    ));
    lines.push(format!("Failures: {}", stats.failures()));
    lines.push(format!("HTTP Errors: {}", stats.http_errors));
    lines.push(format!("Timeouts: {}", stats.timeouts));
    lines.push(format!("Transport Errors: {}", stats.transport_errors));
    match stats.rps_x100(report.elapsed) {
        Some(rps_x100) => lines.push(format!(
            "Avg RPS: {}.{:02}",
            rps_x100 / PERCENT_DIVISOR,
            rps_x100 % PERCENT_DIVISOR
        )),
        None => lines.push("Avg RPS: n/a".to_owned()),
    }
    lines.push(format!(
        "Min/Mean/Max Latency: {} / {} / {}",
        format_latency(stats.min_latency),
        format_latency(stats.mean_latency()),
        format_latency(stats.max_latency)
    ));
    let percentiles = &report.percentiles;
    lines.push(format!(
        "P50/P90/P99 Latency: {} / {} / {}",
        format_latency(Some(percentiles.p50)),
        format_latency(Some(percentiles.p90)),
        format_latency(Some(percentiles.p99))
    ));
    lines.push(format!("Fleet: {}", report.final_snapshot));
    lines
}

pub(crate) fn print_summary(report: &RunReport, use_color: bool) {
    let header = "Summary:";
    if use_color {
        println!("{}", header.bold());
    } else {
        println!("{header}");
    }
    for line in summary_lines(report) {
        if use_color && line.starts_with("Failures:") && report.stats.failures() > 0 {
            println!("{}", line.with(Color::Red));
        } else {
            println!("{line}");
        }
    }
}

/// Colour only when asked for and stdout is a terminal.
#[must_use]
pub fn stdout_supports_color(no_color: bool) -> bool {
    !no_color && std::io::stdout().is_terminal()
}

fn format_latency(latency: Option<Duration>) -> String {
    let Some(latency) = latency else {
        return "n/a".to_owned();
    };
    let micros = latency.as_micros();
    let millis = micros.checked_div(US_PER_MS).unwrap_or(0);
    let fraction = micros.checked_rem(US_PER_MS).unwrap_or(0);
    format!("{}.{:03}ms", millis, fraction)
}
