use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{debug, info};

use crate::args::TesterArgs;
use crate::capabilities::Capabilities;
use crate::config::{TestConfig, apply_config};
use crate::driver::{ModeSelection, TestDriver, stdout_supports_color};
use crate::error::AppResult;
use crate::shutdown::shutdown_channel;
use crate::shutdown_handlers::setup_signal_shutdown_handler;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args(std::env::args_os())?;
    apply_config(&mut args, &matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run_async(args));
    // An interrupted mode menu leaves its stdin read parked on a blocking thread.
    runtime.shutdown_background();
    result
}

fn parse_args<I>(raw_args: I) -> AppResult<(TesterArgs, ArgMatches)>
where
    I: IntoIterator<Item = OsString>,
{
    let matches = TesterArgs::command().get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: TesterArgs) -> AppResult<()> {
    let config = TestConfig::from_args(&args)?;
    let capabilities = Capabilities::detect();
    let selection = args
        .mode
        .map_or(ModeSelection::Interactive, ModeSelection::Fixed);
    info!(
        "Target {} with {} workers for {}s",
        config.target,
        config.concurrency.get(),
        config.duration.as_secs()
    );

    let (shutdown_tx, _shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let mut driver = TestDriver::new(config, capabilities, &shutdown_tx)
        .with_color(stdout_supports_color(args.no_color));
    let result = driver.run(selection).await;

    drop(shutdown_tx.send(()));
    if let Err(err) = signal_handle.await {
        debug!("Signal handler ended abnormally: {}", err);
    }

    let report = result?;
    debug!(
        "{} run finished after {:?} with {} requests",
        report.mode, report.elapsed, report.stats.requests
    );
    Ok(())
}
