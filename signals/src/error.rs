use thiserror::Error;

/// Errors raised by signal write ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The signal was closed; it accepts no further values.
    #[error("signal is closed")]
    Closed,
}
