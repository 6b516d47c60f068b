use std::num::{NonZeroU64, NonZeroUsize};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ValidationError;

/// How the load is shaped over the run.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// Full concurrency for the whole duration.
    Basic,
    /// Staged ramp-up that ends after the last step.
    Ramp,
    /// Ramp-up, then hold full concurrency until the duration elapses.
    Combined,
    /// Delegate the run to the external HTTP benchmarking tool.
    Bench,
}

impl TestMode {
    pub const ALL: [TestMode; 4] = [
        TestMode::Basic,
        TestMode::Ramp,
        TestMode::Combined,
        TestMode::Bench,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TestMode::Basic => "basic",
            TestMode::Ramp => "ramp",
            TestMode::Combined => "combined",
            TestMode::Bench => "bench",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TestMode::Basic => "Basic load test (full concurrency for the whole duration)",
            TestMode::Ramp => "Ramp-up test (staged concurrency over the ramp window)",
            TestMode::Combined => "Combined (ramp-up, then hold until the duration elapses)",
            TestMode::Bench => "Advanced benchmark (external HTTP benchmarking tool)",
        }
    }

    #[must_use]
    pub const fn uses_ramp(self) -> bool {
        matches!(self, TestMode::Ramp | TestMode::Combined)
    }
}

impl std::str::FromStr for TestMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        TestMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidModeSelection {
                value: s.trim().to_owned(),
            })
    }
}

impl std::fmt::Display for TestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

impl From<PositiveU64> for u64 {
    fn from(value: PositiveU64) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}
