use super::*;

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["fleetload", "example.com"])?;

    let expected_no_color = std::env::var("NO_COLOR")
        .ok()
        .and_then(|value| parse_bool_env(&value).ok())
        .unwrap_or(false);

    let checks = [
        (args.target == "example.com", "Unexpected target"),
        (args.concurrency.get() == 10, "Unexpected concurrency"),
        (args.duration.get() == 300, "Unexpected duration"),
        (args.ramp_up == 60, "Unexpected ramp_up"),
        (args.fleet.is_none(), "Expected fleet to be None"),
        (args.mode.is_none(), "Expected mode to be None"),
        (args.steps.get() == 5, "Unexpected steps"),
        (args.delay_ms == 100, "Unexpected delay_ms"),
        (args.request_timeout.get() == 10, "Unexpected request_timeout"),
        (args.report_interval.get() == 10, "Unexpected report_interval"),
        (args.probe_timeout.get() == 5, "Unexpected probe_timeout"),
        (args.project == "loadtest", "Unexpected project"),
        (!args.no_probe, "Expected no_probe to be false"),
        (args.config.is_none(), "Expected config to be None"),
        (!args.verbose, "Expected verbose to be false"),
        (args.no_color == expected_no_color, "Unexpected no_color"),
    ];

    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn parse_args_requires_target() -> AppResult<()> {
    if parse_test_args(["fleetload"]).is_ok() {
        return Err(AppError::validation("Expected missing target to fail"));
    }
    Ok(())
}
