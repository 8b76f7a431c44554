//! Error types for the quickbar-rpc crate.

/// Errors surfaced to senders that wait for a reply.
///
/// Fire-and-forget sends never produce an error: an unreachable target simply
/// drops the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("No context is listening for this message")]
    NoReceiver,

    #[error("Reply channel closed before a response arrived")]
    Disconnected,

    #[error("Unexpected reply to '{0}'")]
    UnexpectedReply(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
