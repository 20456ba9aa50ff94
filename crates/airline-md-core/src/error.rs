//! Error types for the core systems.

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// A one-shot signal was resolved a second time.
    #[error("One-shot signal has already been resolved")]
    AlreadyResolved,
    /// The one-shot signal was dropped before it was resolved.
    #[error("Signal has been dropped")]
    SignalDropped,
}
