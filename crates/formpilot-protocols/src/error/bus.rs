//! Message bus errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    /// The receiving context has no registered listener, or it went away
    /// before answering. Retryable right after scanner injection.
    #[error("no listener is registered on the receiving end")]
    NotListening,

    #[error("reply channel closed before the response was sent")]
    ReplyDropped,

    #[error("message codec error: {0}")]
    Codec(String),
}
