use std::io::{BufRead, Write};

use crate::args::TestMode;
use crate::capabilities::Capabilities;
use crate::error::{AppResult, DriverError, ValidationError};
use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

/// Where the test mode comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelection {
    /// Chosen up front (`--mode` or config file).
    Fixed(TestMode),
    /// Asked once on stdin after the reachability check.
    Interactive,
}

/// Modes the detected tools can run, in menu order.
#[must_use]
pub fn available_modes(capabilities: &Capabilities) -> Vec<TestMode> {
    TestMode::ALL
        .into_iter()
        .filter(|mode| ensure_available(*mode, capabilities).is_ok())
        .collect()
}

/// Rejects modes whose external tool was not found.
///
/// # Errors
///
/// Returns `ModeUnavailable` for `bench` without the benchmarking tool.
pub fn ensure_available(
    mode: TestMode,
    capabilities: &Capabilities,
) -> Result<(), ValidationError> {
    if mode == TestMode::Bench && !capabilities.has_bench_tool() {
        return Err(bench_unavailable());
    }
    Ok(())
}

pub(crate) const fn bench_unavailable() -> ValidationError {
    ValidationError::ModeUnavailable {
        mode: TestMode::Bench.as_str(),
        reason: "the 'ab' benchmarking tool was not found on PATH",
    }
}

/// Resolves one menu answer: a 1-based number or a mode name.
///
/// # Errors
///
/// Returns an error for empty input, an out-of-range number, an unknown name,
/// or a mode that is not in `available`.
pub fn parse_selection(line: &str, available: &[TestMode]) -> Result<TestMode, ValidationError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NoModeSelected);
    }
    if let Ok(number) = trimmed.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| available.get(index))
            .copied()
            .ok_or_else(|| ValidationError::InvalidModeSelection {
                value: trimmed.to_owned(),
            });
    }
    let mode: TestMode = trimmed.parse()?;
    if available.contains(&mode) {
        Ok(mode)
    } else {
        Err(ValidationError::ModeUnavailable {
            mode: mode.as_str(),
            reason: "not offered with the detected tools",
        })
    }
}

/// Prints the numbered menu followed by the answer prompt.
///
/// # Errors
///
/// Returns an error when writing to `output` fails.
pub fn write_menu<W>(available: &[TestMode], output: &mut W) -> std::io::Result<()>
where
    W: Write,
{
    writeln!(output, "Select a test mode:")?;
    for (index, mode) in available.iter().enumerate() {
        writeln!(output, "  {}) {}", index.saturating_add(1), mode.label())?;
    }
    write!(output, "Choice [1-{}]: ", available.len())?;
    output.flush()
}

/// Prints the menu of available modes and reads a single answer.
///
/// # Errors
///
/// Returns an error when stdin/stdout fail or the answer is not a valid mode.
pub fn prompt_mode<R, W>(capabilities: &Capabilities, input: &mut R, output: &mut W) -> AppResult<TestMode>
where
    R: BufRead,
    W: Write,
{
    let available = available_modes(capabilities);
    write_menu(&available, output)?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ValidationError::NoModeSelected.into());
    }
    Ok(parse_selection(&line, &available)?)
}

/// Reads one line from stdin; `None` when stdin is closed.
pub(crate) fn read_stdin_line() -> std::io::Result<Option<String>> {
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    Ok((read > 0).then_some(line))
}

/// Waits for the menu answer produced by `read_answer` on a blocking thread,
/// or for shutdown, whichever comes first.
///
/// # Errors
///
/// Returns `DriverError::Interrupted` when shutdown wins, `NoModeSelected`
/// when the input is closed, and the parse error for an invalid answer.
pub(crate) async fn await_selection<F>(
    read_answer: F,
    available: &[TestMode],
    shutdown_rx: &mut ShutdownReceiver,
) -> AppResult<TestMode>
where
    F: FnOnce() -> std::io::Result<Option<String>> + Send + 'static,
{
    let answer = tokio::task::spawn_blocking(read_answer);
    tokio::select! {
        biased;
        () = wait_for_shutdown(shutdown_rx) => Err(DriverError::Interrupted {
            during: "mode selection",
        }
        .into()),
        joined = answer => {
            let Some(line) = joined?? else {
                return Err(ValidationError::NoModeSelected.into());
            };
            Ok(parse_selection(&line, available)?)
        }
    }
}
