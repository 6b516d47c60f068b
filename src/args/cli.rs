use clap::Parser;

use super::parsers::{parse_bool_env, parse_positive_u64, parse_positive_usize};
use super::types::{PositiveU64, PositiveUsize, TestMode};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load driver with staged ramp-up and auto-scaling fleet correlation.",
    next_help_heading = "Advanced Options"
)]
pub struct TesterArgs {
    /// Target host or URL (http:// is assumed when no scheme is given)
    #[arg(value_name = "TARGET", help_heading = "Common Options")]
    pub target: String,

    /// Region label passed through to the scaling probe
    #[arg(long, short = 'r', env = "AWS_REGION", help_heading = "Common Options")]
    pub region: Option<String>,

    /// Number of concurrent workers
    #[arg(
        long,
        short = 'c',
        default_value = "10",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub concurrency: PositiveUsize,

    /// Total test duration (seconds)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "300",
        value_parser = parse_positive_u64,
        help_heading = "Common Options"
    )]
    pub duration: PositiveU64,

    /// Ramp-up window (seconds) used by the ramp and combined modes
    #[arg(
        long = "ramp-up",
        short = 'R',
        default_value = "60",
        help_heading = "Common Options"
    )]
    pub ramp_up: u64,

    /// Auto-scaling group to sample (discovered by project tag when omitted)
    #[arg(long = "fleet", short = 'g', help_heading = "Common Options")]
    pub fleet: Option<String>,

    /// Test mode; prompts interactively when omitted
    #[arg(long, short = 'm', value_enum, help_heading = "Common Options")]
    pub mode: Option<TestMode>,

    /// Number of ramp steps
    #[arg(long, default_value = "5", value_parser = parse_positive_usize)]
    pub steps: PositiveUsize,

    /// Per-worker delay between requests in milliseconds (0 disables pacing)
    #[arg(long = "delay-ms", default_value = "100")]
    pub delay_ms: u64,

    /// Request timeout (seconds)
    #[arg(long = "timeout", default_value = "10", value_parser = parse_positive_u64)]
    pub request_timeout: PositiveU64,

    /// Interval between progress reports (seconds)
    #[arg(
        long = "report-interval",
        default_value = "10",
        value_parser = parse_positive_u64
    )]
    pub report_interval: PositiveU64,

    /// Upper bound for a single scaling probe sample (seconds)
    #[arg(long = "probe-timeout", default_value = "5", value_parser = parse_positive_u64)]
    pub probe_timeout: PositiveU64,

    /// Project tag value used to discover the fleet when --fleet is omitted
    #[arg(long, default_value = "loadtest")]
    pub project: String,

    /// Disable the scaling probe even when the cloud CLI is installed
    #[arg(long = "no-probe")]
    pub no_probe: bool,

    /// Path to config file (TOML/JSON). Defaults to ./fleetload.toml or ./fleetload.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by FLEETLOAD_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
