mod app;
mod bench;
mod config;
mod driver;
mod http;
mod probe;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use bench::BenchError;
pub use config::ConfigError;
pub use driver::DriverError;
pub use http::HttpError;
pub use probe::ProbeError;
pub use validation::ValidationError;
