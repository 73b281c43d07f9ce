//! Page scanner errors.

use thiserror::Error;

use super::BusError;

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("page access error: {0}")]
    Page(String),

    #[error("javascript evaluation error: {0}")]
    Script(String),

    #[error("unexpected message in scanner context: {0}")]
    UnexpectedMessage(String),

    #[error(transparent)]
    Bus(#[from] BusError),
}
