use tracing::debug;

use crate::error::DriverError;

/// Lifecycle of one driver invocation.
///
/// Every allowed edge points forward, so no state is ever entered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    ReachabilityCheck,
    BasicRun,
    RampRun,
    Reporting,
    Done,
    Aborted,
}

impl DriverState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DriverState::Idle => "Idle",
            DriverState::ReachabilityCheck => "ReachabilityCheck",
            DriverState::BasicRun => "BasicRun",
            DriverState::RampRun => "RampRun",
            DriverState::Reporting => "Reporting",
            DriverState::Done => "Done",
            DriverState::Aborted => "Aborted",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, DriverState::Done | DriverState::Aborted)
    }

    const fn can_advance_to(self, next: DriverState) -> bool {
        matches!(
            (self, next),
            (DriverState::Idle, DriverState::ReachabilityCheck)
                | (
                    DriverState::ReachabilityCheck,
                    DriverState::BasicRun | DriverState::RampRun | DriverState::Aborted
                )
                | (
                    DriverState::BasicRun | DriverState::RampRun,
                    DriverState::Reporting
                )
                | (DriverState::Reporting, DriverState::Done)
        )
    }
}

impl std::fmt::Display for DriverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StateMachine {
    current: DriverState,
    history: Vec<DriverState>,
}

impl StateMachine {
    pub(crate) fn new() -> Self {
        Self {
            current: DriverState::Idle,
            history: vec![DriverState::Idle],
        }
    }

    pub(crate) const fn current(&self) -> DriverState {
        self.current
    }

    pub(crate) fn history(&self) -> &[DriverState] {
        &self.history
    }

    pub(crate) fn advance(&mut self, next: DriverState) -> Result<(), DriverError> {
        if !self.current.can_advance_to(next) {
            return Err(DriverError::InvalidTransition {
                from: self.current.as_str(),
                to: next.as_str(),
            });
        }
        debug!("Driver state {} -> {}", self.current, next);
        self.current = next;
        self.history.push(next);
        Ok(())
    }
}
