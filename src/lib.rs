//! Core library for the `fleetload` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration loading, request execution, the worker pool and ramp
//! controller, metrics aggregation, fleet scaling probes, and the test driver
//! that ties them together. The primary user-facing interface is the
//! `fleetload` command-line application; library APIs may evolve with it.
pub mod args;
pub mod capabilities;
pub mod config;
pub mod driver;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod pool;
pub mod probe;
pub mod ramp;
pub mod shutdown;
pub mod shutdown_handlers;

#[cfg(test)]
mod test_support;
