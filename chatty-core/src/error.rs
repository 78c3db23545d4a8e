//! Error types for Chatty.
//!
//! This module provides a small error hierarchy using `thiserror`:
//!
//! - [`ChattyError`] - Top-level error type for wiring a pipeline together
//! - [`StageError`] - Errors raised while assembling or running a stage
//!
//! Cancellation is never an error: it travels inside
//! [`TransformResult`](crate::TransformResult).

use crate::strategy::Phase;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Chatty operations.
#[derive(Error, Debug)]
pub enum ChattyError {
    /// A stage could not be assembled.
    #[error("stage error: {0}")]
    Stage(#[from] StageError),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[source] BoxError),

    /// The executor was built without any chat to select.
    #[error("no chats configured")]
    NoChats,

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur while building or running a stage processor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// A strategy was registered on a processor for another phase.
    #[error("strategy tagged {found} cannot run in the {expected} phase")]
    PhaseMismatch {
        /// Phase of the processor.
        expected: Phase,
        /// Phase the strategy reported.
        found: Phase,
    },

    /// A strategy panicked while handling a context.
    #[error("strategy panicked: {0}")]
    Panicked(String),
}

impl From<BoxError> for ChattyError {
    fn from(err: BoxError) -> Self {
        ChattyError::Custom(err)
    }
}
