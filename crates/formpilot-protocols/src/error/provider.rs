//! Inference provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("failed to parse model response: {0}")]
    InvalidResponse(String),
}
