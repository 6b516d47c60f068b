//! Staged concurrency: step schedule and the controller that walks it.
mod controller;
mod schedule;


pub use controller::{RampController, RampOutcome, StepProgress, StepReporter};
pub use schedule::{DEFAULT_STEP_COUNT, RampStep, schedule};
