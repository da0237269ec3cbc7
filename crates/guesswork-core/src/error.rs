//! Error types shared across the guesswork workspace.
//!
//! Both error families here are fatal and surface synchronously from the
//! constructing call, before any generation or guessing begins. Exceptions
//! raised by a target under test are not errors of this system; they travel
//! through `Outcome::Raise` instead.

use thiserror::Error;

/// A type specification could not be mapped to a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The annotation names a type the grammar does not know.
    #[error("unknown type name: {0:?}")]
    UnknownType(String),

    /// The annotation is syntactically malformed.
    #[error("malformed annotation {annotation:?}: {reason}")]
    Malformed { annotation: String, reason: String },
}

impl ResolutionError {
    /// Creates a new malformed-annotation error.
    pub fn malformed(annotation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            annotation: annotation.into(),
            reason: reason.into(),
        }
    }
}

/// Malformed generator bounds or contradictory loop configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Inclusive length bounds are inverted.
    #[error("invalid length bounds: min {min} exceeds max {max}")]
    LengthBounds { min: usize, max: usize },

    /// Numeric interval bounds are empty or inverted.
    #[error("invalid numeric bounds: {0}")]
    NumericBounds(String),

    /// A probability parameter lies outside `[0, 1]`.
    #[error("invalid chance {0}: must be within [0, 1]")]
    Chance(f64),

    /// A union descriptor or generator with no alternatives.
    #[error("union has no alternatives")]
    EmptyUnion,

    /// A choice generator with no values to choose from.
    #[error("choice generator has no values")]
    EmptyChoices,

    /// Union weights do not match the alternatives.
    #[error("invalid union weights: {0}")]
    Weights(String),

    /// A string/bytes generator with an empty alphabet.
    #[error("alphabet is empty")]
    EmptyAlphabet,

    /// Instruction-granularity coverage was requested but a function in the
    /// target's layout declares no instruction sites.
    #[error("no instruction sites declared for function {0:?}")]
    MissingInstrumentation(String),

    /// A guess run with no stop condition, call limit, or timeout would
    /// never terminate.
    #[error("unbounded guess: no stop condition, call limit, or timeout configured")]
    UnboundedGuess,
}

impl ConfigurationError {
    /// Creates a new numeric-bounds error.
    pub fn numeric_bounds(message: impl Into<String>) -> Self {
        Self::NumericBounds(message.into())
    }

    /// Creates a new union-weights error.
    pub fn weights(message: impl Into<String>) -> Self {
        Self::Weights(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_display() {
        let err = ResolutionError::UnknownType("frob".into());
        assert_eq!(err.to_string(), "unknown type name: \"frob\"");

        let err = ResolutionError::malformed("list[", "unclosed bracket");
        assert!(err.to_string().contains("unclosed bracket"));
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::LengthBounds { min: 4, max: 1 };
        assert_eq!(err.to_string(), "invalid length bounds: min 4 exceeds max 1");

        let err = ConfigurationError::numeric_bounds("start 5 is not below stop 5");
        assert!(err.to_string().contains("start 5"));

        let err = ConfigurationError::MissingInstrumentation("h".into());
        assert!(err.to_string().contains("\"h\""));
    }
}
