//! Error type for generator construction.

use thiserror::Error;

use guesswork_core::{ConfigurationError, ResolutionError};

/// Errors surfaced while turning a target's signature into generators.
///
/// Both variants are fatal and raised before any value is generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactoryError {
    /// An annotation could not be resolved into a descriptor.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A descriptor carried malformed generation parameters.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
