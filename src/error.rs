//! Error type shared by every effect.
//!
//! Configuration problems surface as [`EffectError::InvalidParameter`] when an
//! effect (or a pixel buffer) is constructed. [`EffectError::ProcessingFailure`]
//! is reserved for structural inconsistencies discovered inside `apply`, such
//! as a channel selector that does not exist in the image or stage outputs
//! with mismatched dimensions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    /// A configuration value is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Unexpected failure while applying an effect.
    #[error("processing failure: {0}")]
    ProcessingFailure(String),
}

impl EffectError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EffectError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        EffectError::ProcessingFailure(message.into())
    }

    /// True for errors raised at construction time.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, EffectError::InvalidParameter { .. })
    }
}

pub type Result<T> = std::result::Result<T, EffectError>;
