//! Domain-agnostic evolutionary search.
//!
//! Provides a pluggable genetic engine and an island model built on top of
//! it:
//!
//! - **Genetic engine** ([`genetic`]): one population evolved through
//!   user-supplied random, mutation, crossover and fitness callbacks, with
//!   configurable selection, elitism, deduplication and ranking comparator.
//! - **Island model** ([`island`]): several engines evolving in isolation,
//!   exchanging individuals through probabilistic migration, and optionally
//!   merging into one pooled "continent" for a few generations before being
//!   redistributed.
//!
//! Both expose the same `seed` / `estimate` / `breed` / `best` / `stats`
//! surface through the [`Evolver`] trait, so a driver loop can run either.
//! The driver alone decides when to stop.
//!
//! ```
//! use u_genetic::genetic::{Evaluation, Genetic, GeneticConfig};
//! use rand::Rng;
//!
//! let config = GeneticConfig::new(
//!     30,
//!     |rng| rng.random_range(-100..100i32),
//!     |x: &i32, _is_last| Evaluation::new(-(*x as f64).abs()),
//! )
//! .with_mutation(|x, rng| x + rng.random_range(-3..=3))
//! .with_crossover(|a, b, _| vec![(a + b) / 2])
//! .with_seed(42);
//!
//! let mut genetic = Genetic::new(config)?;
//! genetic.seed(Vec::new())?;
//! for _ in 0..50 {
//!     genetic.estimate();
//!     genetic.breed()?;
//! }
//! genetic.estimate();
//! assert!(genetic.best(1)[0].fitness.unwrap() > -10.0);
//! # Ok::<(), u_genetic::EvolutionError>(())
//! ```

pub mod error;
pub mod genetic;
pub mod island;
mod random;

pub use error::{EvoResult, EvolutionError};

use genetic::{Phenotype, Stats};

/// Common surface of [`genetic::Genetic`] and [`island::IslandModel`].
pub trait Evolver<E> {
    /// Starts the population from `entities`, filled up with random ones.
    fn seed(&mut self, entities: Vec<E>) -> EvoResult<()>;

    /// Scores and ranks the current population.
    fn estimate(&mut self);

    /// Replaces the population with the next generation.
    fn breed(&mut self) -> EvoResult<()>;

    /// Best individuals of the current ranking.
    fn best(&self, count: usize) -> Vec<Phenotype<E>>;

    /// Statistics of the last estimate.
    fn stats(&self) -> Stats;

    /// Snapshot of every individual currently held.
    fn population(&self) -> Vec<Phenotype<E>>;
}
