use super::apply::apply_config_file;
use super::*;
use crate::args::{TestMode, TesterArgs};
use crate::error::{AppError, AppResult, ValidationError};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

fn parse_with_matches(raw: &[&str]) -> AppResult<(TesterArgs, clap::ArgMatches)> {
    let matches = TesterArgs::command().try_get_matches_from(raw)?;
    let args = TesterArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

#[test]
fn load_config_file_reads_toml() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fleetload.toml");
    std::fs::write(
        &path,
        "concurrency = 4\nduration = 20\nramp_up = 10\nmode = \"ramp\"\nfleet = \"web-asg\"\n",
    )?;

    let config = load_config_file(&path)?;
    if config.concurrency != Some(4) || config.duration != Some(20) {
        return Err(AppError::validation("Unexpected numeric values"));
    }
    if config.mode != Some(TestMode::Ramp) {
        return Err(AppError::validation("Unexpected mode"));
    }
    if config.fleet.as_deref() != Some("web-asg") {
        return Err(AppError::validation("Unexpected fleet"));
    }
    Ok(())
}

#[test]
fn load_config_file_reads_json() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fleetload.json");
    std::fs::write(&path, r#"{"region": "us-east-2", "delay_ms": 250}"#)?;

    let config = load_config_file(&path)?;
    if config.region.as_deref() != Some("us-east-2") || config.delay_ms != Some(250) {
        return Err(AppError::validation("Unexpected JSON config values"));
    }
    Ok(())
}

#[test]
fn load_config_file_rejects_unknown_extension() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fleetload.yaml");
    std::fs::write(&path, "concurrency: 3")?;

    match load_config_file(&path) {
        Err(AppError::Config(crate::error::ConfigError::UnsupportedExtension { ext }))
            if ext == "yaml" =>
        {
            Ok(())
        }
        _ => Err(AppError::validation("Expected UnsupportedExtension")),
    }
}

#[test]
fn cli_values_take_precedence_over_config() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["fleetload", "example.com", "-c", "7"])?;
    let config = types::ConfigFile {
        concurrency: Some(3),
        duration: Some(42),
        project: Some("shop".to_owned()),
        ..types::ConfigFile::default()
    };

    apply_config_file(&mut args, &matches, config)?;

    if args.concurrency.get() != 7 {
        return Err(AppError::validation("CLI concurrency should win"));
    }
    if args.duration.get() != 42 {
        return Err(AppError::validation("Config duration should apply"));
    }
    if args.project != "shop" {
        return Err(AppError::validation("Config project should apply"));
    }
    Ok(())
}

#[test]
fn config_rejects_zero_concurrency() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["fleetload", "example.com"])?;
    let config = types::ConfigFile {
        concurrency: Some(0),
        ..types::ConfigFile::default()
    };

    match apply_config_file(&mut args, &matches, config) {
        Err(AppError::Config(crate::error::ConfigError::FieldMustBePositive { field, .. }))
            if field == "concurrency" =>
        {
            Ok(())
        }
        _ => Err(AppError::validation("Expected FieldMustBePositive")),
    }
}

#[test]
fn test_config_from_args_normalizes_target() -> AppResult<()> {
    let (args, _) = parse_with_matches(&[
        "fleetload",
        "lb.example.com",
        "-t",
        "90",
        "-R",
        "30",
        "--delay-ms",
        "250",
    ])?;
    let config = TestConfig::from_args(&args)?;

    if config.target.as_str() != "http://lb.example.com/" {
        return Err(AppError::validation(format!(
            "Unexpected target {}",
            config.target
        )));
    }
    if config.duration != Duration::from_secs(90) || config.ramp_up != Duration::from_secs(30) {
        return Err(AppError::validation("Unexpected durations"));
    }
    if config.request_delay != Duration::from_millis(250) {
        return Err(AppError::validation("Unexpected request delay"));
    }
    if config.run_length(TestMode::Ramp) != Duration::from_secs(30) {
        return Err(AppError::validation("Ramp run length should equal the ramp window"));
    }
    Ok(())
}

#[test]
fn validate_for_ramp_modes_checks_window() -> AppResult<()> {
    let (args, _) = parse_with_matches(&["fleetload", "example.com", "-t", "30", "-R", "60"])?;
    let config = TestConfig::from_args(&args)?;

    config.validate_for(TestMode::Basic)?;
    match config.validate_for(TestMode::Combined) {
        Err(ValidationError::RampExceedsDuration {
            ramp_secs: 60,
            duration_secs: 30,
        }) => {}
        _ => return Err(AppError::validation("Expected RampExceedsDuration")),
    }

    let (zero_args, _) = parse_with_matches(&["fleetload", "example.com", "-R", "0"])?;
    let zero = TestConfig::from_args(&zero_args)?;
    zero.validate_for(TestMode::Combined)?;
    match zero.validate_for(TestMode::Ramp) {
        Err(ValidationError::RampTooShort) => Ok(()),
        _ => Err(AppError::validation("Expected RampTooShort")),
    }
}
