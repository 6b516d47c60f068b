use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Invalid driver transition from {from} to {to}.")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("Interrupted during {during}; no load was generated.")]
    Interrupted { during: &'static str },
}
