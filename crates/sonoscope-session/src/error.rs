//! Error types for sonoscope-session.

use sonoscope_core::AnalysisError;
use thiserror::Error;

/// Error type for session controller operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Session worker disconnected")]
    Disconnected,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, SessionError>;
