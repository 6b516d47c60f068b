//! HTTP request execution and the pre-flight reachability check.
mod client;
mod executor;
mod reachability;


pub use client::build_client;
pub use executor::{HttpExecutor, RequestExecutor, execute_request};
pub use reachability::check_reachability;
