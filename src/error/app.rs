use thiserror::Error;

use super::{BenchError, ConfigError, DriverError, HttpError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("Benchmark error: {0}")]
    Bench(#[from] BenchError),
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }

    /// Whether the failure was the pre-flight reachability probe rejecting the target.
    #[must_use]
    pub const fn is_reachability_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(
                HttpError::UnexpectedStatus { .. }
                    | HttpError::ReachabilityTimeout { .. }
                    | HttpError::ReachabilityTransport { .. }
            )
        )
    }
}
