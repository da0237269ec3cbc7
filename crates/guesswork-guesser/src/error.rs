//! Error type for guesser construction and configuration.

use thiserror::Error;

use guesswork_core::ConfigurationError;
use guesswork_generator::FactoryError;

/// Errors raised synchronously before any attempt runs.
///
/// Exceptions raised by the target are never errors here: they are recorded
/// in the guesser's state and retrievable after the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuesserError {
    /// Building generators for the target's signature failed.
    #[error(transparent)]
    Factory(#[from] FactoryError),

    /// Tracer or guess-loop configuration is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
