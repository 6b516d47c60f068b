use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Target must not be empty.")]
    TargetEmpty,
    #[error("Invalid target '{value}': {source}")]
    InvalidTarget {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported target scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("Ramp-up ({ramp_secs}s) must not exceed the test duration ({duration_secs}s).")]
    RampExceedsDuration { ramp_secs: u64, duration_secs: u64 },
    #[error("Ramp-up duration must be >= 1 second for ramp modes.")]
    RampTooShort,
    #[error("Invalid mode selection '{value}'.")]
    InvalidModeSelection { value: String },
    #[error("No mode selected (stdin closed).")]
    NoModeSelected,
    #[error("Mode '{mode}' is unavailable: {reason}.")]
    ModeUnavailable { mode: &'static str, reason: &'static str },
    #[error("{message}")]
    TestExpectation { message: &'static str },
    #[error("{message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
