//! Error types shared by the genetic engine and the island model.

use thiserror::Error;

/// Top-level error type for evolution operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    /// The population could not be filled to its configured size.
    ///
    /// Raised by `seed()` and by the fill step of `breed()` when the random
    /// callback (filtered through `deduplicate`) cannot produce enough
    /// individuals within `population_size × 10` attempts.
    #[error(
        "could not fill population to {required} individuals \
         (got {produced} after {attempts} attempts); check the random or deduplicate callback"
    )]
    PopulationFill {
        required: usize,
        produced: usize,
        attempts: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for evolution operations.
pub type EvoResult<T> = Result<T, EvolutionError>;
