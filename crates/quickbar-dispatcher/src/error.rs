//! Error types for the dispatcher.

/// A failure reported by the host browser (tab creation, search execution,
/// provider lookup).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur while handling one message
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The message did not come from a tab
    #[error("Message '{0}' has no sender tab")]
    MissingSender(&'static str),

    /// Host call failed
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
