//! Coordinator errors.

use thiserror::Error;

use super::BusError;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("no active browser tab found")]
    NoActiveTab,

    #[error("failed to inject scanner: {0}")]
    Injection(String),

    #[error(
        "scanner did not respond after {attempts} attempts; reload the page and try again"
    )]
    ScannerUnresponsive { attempts: u32 },

    #[error("browser endpoint error: {0}")]
    Browser(String),

    #[error(transparent)]
    Bus(#[from] BusError),
}
