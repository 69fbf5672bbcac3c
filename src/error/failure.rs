//! Error types raised by the convenience entry points.

use std::error::Error as StdError;

use thiserror::Error;

use super::message::Messages;

/// All messages of a failed validation, bundled as a single error.
///
/// Returned by [`ValidatorExt::validate_or_raise`](crate::ValidatorExt::validate_or_raise)
/// for callers who prefer `?` over matching on a `Validation`.
#[derive(Debug, Clone, Error)]
#[error("{messages}")]
pub struct ValidationFailed {
    /// Every message produced by the failed validation.
    pub messages: Messages,
}

impl From<Messages> for ValidationFailed {
    fn from(messages: Messages) -> Self {
        Self { messages }
    }
}

/// An error returned by a factory's constructor.
///
/// The original error is kept as the source so callers can downcast it.
#[derive(Debug, Error)]
#[error("{label} constructor failed: {source}")]
pub struct ConstructionError {
    /// Label of the factory whose constructor failed.
    pub label: String,
    /// The error returned by the constructor.
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl ConstructionError {
    /// Wraps a constructor error for the factory labelled `label`.
    pub fn new(label: impl Into<String>, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
        }
    }
}
