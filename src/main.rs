mod args;
mod capabilities;
mod config;
mod driver;
mod entry;
mod error;
mod http;
mod logger;
mod metrics;
mod pool;
mod probe;
mod ramp;
mod shutdown;
mod shutdown_handlers;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

fn main() -> ExitCode {
    match entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
