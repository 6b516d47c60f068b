use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::loader::load_config;
use super::types::ConfigFile;

/// Loads the config file (explicit or default) and fills every argument the
/// user did not set on the command line.
///
/// # Errors
///
/// Returns an error when the config file cannot be loaded or holds invalid values.
pub fn apply_config(args: &mut TesterArgs, matches: &ArgMatches) -> AppResult<()> {
    let Some(config) = load_config(args.config.as_deref())? else {
        return Ok(());
    };
    apply_config_file(args, matches, config)
}

pub(crate) fn apply_config_file(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: ConfigFile,
) -> AppResult<()> {
    if let Some(region) = config.region
        && !is_cli(matches, "region")
    {
        args.region = Some(region);
    }
    if let Some(concurrency) = config.concurrency
        && !is_cli(matches, "concurrency")
    {
        args.concurrency = ensure_positive_usize(concurrency, "concurrency")?;
    }
    if let Some(duration) = config.duration
        && !is_cli(matches, "duration")
    {
        args.duration = ensure_positive_u64(duration, "duration")?;
    }
    if let Some(ramp_up) = config.ramp_up
        && !is_cli(matches, "ramp_up")
    {
        args.ramp_up = ramp_up;
    }
    if let Some(fleet) = config.fleet
        && !is_cli(matches, "fleet")
    {
        args.fleet = Some(fleet);
    }
    if let Some(mode) = config.mode
        && !is_cli(matches, "mode")
    {
        args.mode = Some(mode);
    }
    if let Some(steps) = config.steps
        && !is_cli(matches, "steps")
    {
        args.steps = ensure_positive_usize(steps, "steps")?;
    }
    if let Some(delay_ms) = config.delay_ms
        && !is_cli(matches, "delay_ms")
    {
        args.delay_ms = delay_ms;
    }
    if let Some(timeout) = config.timeout
        && !is_cli(matches, "request_timeout")
    {
        args.request_timeout = ensure_positive_u64(timeout, "timeout")?;
    }
    if let Some(interval) = config.report_interval
        && !is_cli(matches, "report_interval")
    {
        args.report_interval = ensure_positive_u64(interval, "report_interval")?;
    }
    if let Some(probe_timeout) = config.probe_timeout
        && !is_cli(matches, "probe_timeout")
    {
        args.probe_timeout = ensure_positive_u64(probe_timeout, "probe_timeout")?;
    }
    if let Some(project) = config.project
        && !is_cli(matches, "project")
    {
        args.project = project;
    }
    if let Some(no_probe) = config.no_probe
        && !is_cli(matches, "no_probe")
    {
        args.no_probe = no_probe;
    }
    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
