//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use cli::TesterArgs;
pub use types::{PositiveU64, PositiveUsize, TestMode};

pub(crate) use defaults::{
    BENCH_TOOL, CLOUD_CLI, DEFAULT_CONFIG_FILES, DEFAULT_USER_AGENT, REACHABILITY_TIMEOUT,
};
pub(crate) use parsers::normalize_target;
#[cfg(test)]
pub(crate) use test_support::parse_test_args;
