use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::TestConfig;
use crate::error::{AppResult, BenchError};
use crate::metrics::{MetricsAggregator, OutcomeClass, RequestOutcome};
use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

/// Request ceiling passed with `-n`; matches what `ab -t` assumes on its own.
const BENCH_REQUEST_CAP: u64 = 50_000;
const TOTAL_TIME_COLUMN: &str = "ttime";

/// Request counters printed by the benchmarking tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BenchCounters {
    pub(crate) complete: u64,
    pub(crate) failed: u64,
    pub(crate) non_2xx: u64,
}

fn counter(stdout: &str, label: &str) -> Option<u64> {
    stdout
        .lines()
        .find_map(|line| line.trim_start().strip_prefix(label))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}

pub(crate) fn parse_counters(stdout: &str) -> Result<BenchCounters, BenchError> {
    let complete = counter(stdout, "Complete requests:").ok_or(BenchError::MissingField {
        field: "Complete requests",
    })?;
    let failed = counter(stdout, "Failed requests:").ok_or(BenchError::MissingField {
        field: "Failed requests",
    })?;
    Ok(BenchCounters {
        complete,
        failed,
        non_2xx: counter(stdout, "Non-2xx responses:").unwrap_or(0),
    })
}

/// Reads the per-request total times (milliseconds) from a gnuplot TSV.
pub(crate) fn parse_samples(tsv: &str) -> Result<Vec<Duration>, BenchError> {
    let mut lines = tsv.lines();
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let column = header
        .split('\t')
        .position(|name| name.trim() == TOTAL_TIME_COLUMN)
        .ok_or(BenchError::MissingField {
            field: TOTAL_TIME_COLUMN,
        })?;
    Ok(lines
        .filter_map(|line| line.split('\t').nth(column))
        .filter_map(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .collect())
}

/// Turns the samples into a standalone aggregator, attributing the first
/// `non_2xx` to HTTP errors and the next `failed` to transport errors.
pub(crate) fn samples_to_metrics(samples: &[Duration], counters: BenchCounters) -> MetricsAggregator {
    let local = MetricsAggregator::new();
    let failures_end = counters.non_2xx.saturating_add(counters.failed);
    let now = Instant::now();
    for (index, latency) in samples.iter().enumerate() {
        let position = u64::try_from(index).unwrap_or(u64::MAX);
        let class = if position < counters.non_2xx {
            OutcomeClass::HttpError
        } else if position < failures_end {
            OutcomeClass::TransportError
        } else {
            OutcomeClass::Success
        };
        local.record(&RequestOutcome {
            class,
            status: None,
            latency: *latency,
            started_at: now,
        });
    }
    local
}

fn bench_command(program: &Path, config: &TestConfig, scratch: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.arg("-t")
        .arg(config.duration.as_secs().to_string())
        .arg("-c")
        .arg(config.concurrency.get().to_string())
        .arg("-n")
        .arg(BENCH_REQUEST_CAP.to_string())
        .arg("-s")
        .arg(config.request_timeout.as_secs().to_string())
        .arg("-g")
        .arg(scratch)
        .arg(config.target.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Runs the external benchmark and merges its results into `aggregator`.
/// Returns `true` when the run was interrupted.
///
/// The scratch sample file is removed when this returns, on every path.
///
/// # Errors
///
/// Returns an error when the tool cannot be started, exits non-zero, or its
/// output cannot be read.
pub(super) async fn run_bench(
    program: &Path,
    config: &TestConfig,
    aggregator: &MetricsAggregator,
    shutdown_rx: &mut ShutdownReceiver,
) -> AppResult<bool> {
    let scratch = NamedTempFile::new().map_err(|source| BenchError::Scratch { source })?;
    let program_name = program.display().to_string();
    debug!("Benchmark samples go to {}", scratch.path().display());

    let child = bench_command(program, config, scratch.path())
        .spawn()
        .map_err(|source| BenchError::Spawn {
            program: program_name.clone(),
            source,
        })?;
    info!(
        "Running {} with {} connections for {}s",
        program_name,
        config.concurrency.get(),
        config.duration.as_secs()
    );

    let output = tokio::select! {
        biased;
        () = wait_for_shutdown(shutdown_rx) => {
            warn!("Benchmark interrupted; discarding partial results.");
            return Ok(true);
        }
        output = child.wait_with_output() => output.map_err(|source| BenchError::Spawn {
            program: program_name.clone(),
            source,
        })?,
    };

    if !output.status.success() {
        return Err(BenchError::NonZeroExit {
            program: program_name,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        }
        .into());
    }

    let counters = parse_counters(&String::from_utf8_lossy(&output.stdout))?;
    let tsv = tokio::fs::read_to_string(scratch.path())
        .await
        .map_err(|source| BenchError::ReadSamples { source })?;
    let samples = parse_samples(&tsv)?;
    if u64::try_from(samples.len()).unwrap_or(u64::MAX) != counters.complete {
        debug!(
            "Benchmark reported {} complete requests but wrote {} samples",
            counters.complete,
            samples.len()
        );
    }
    aggregator.merge_from(&samples_to_metrics(&samples, counters));
    Ok(false)
}
