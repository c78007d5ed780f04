//! Error types for sonoscope-core.

use thiserror::Error;

/// Error type for buffer and measurement operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Trim range {start}..{end} s outside buffer duration {duration} s")]
    Range {
        start: f64,
        end: f64,
        duration: f64,
    },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, AnalysisError>;
