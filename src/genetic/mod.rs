//! Single-population genetic engine.
//!
//! A generic, domain-agnostic engine driven by user callbacks. The entity
//! type is opaque: users supply how to create, score, recombine and perturb
//! it through [`GeneticConfig`].
//!
//! # Key Types
//!
//! - [`GeneticConfig`]: callbacks and parameters (population size, rates,
//!   elitism, selection, comparator)
//! - [`Genetic`]: owns one population; `seed` / `estimate` / `breed` / `best`
//! - [`Phenotype`]: an entity with its fitness and auxiliary state
//! - [`Selection`]: parent and migrant selection strategies
//! - [`Stats`]: per-generation population statistics
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

mod config;
mod runner;
mod selection;
mod stats;
mod types;

pub use config::GeneticConfig;
pub use runner::Genetic;
pub use selection::{CustomSelectFn, Selection, SelectionState};
pub use stats::Stats;
pub use types::{
    CrossoverFn, DeduplicateFn, Evaluation, FitnessFn, MutationFn, Optimize, Phenotype, RandomFn,
    State,
};
