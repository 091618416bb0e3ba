//! Core data types for the genetic engine.
//!
//! The engine never looks inside an entity: it only clones, moves and hands
//! entities to the user callbacks. What the engine tracks per individual is
//! captured by [`Phenotype`].

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Auxiliary data returned alongside a fitness value.
///
/// A string-keyed map of arbitrary JSON values, e.g. partial scores or
/// diagnostics produced while evaluating.
pub type State = serde_json::Map<String, serde_json::Value>;

/// One individual of a population: an entity with its evaluated fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype<E> {
    /// Fitness from the last `estimate()`, `None` until evaluated.
    pub fitness: Option<f64>,

    /// The candidate solution.
    pub entity: E,

    /// Auxiliary data returned by the fitness callback.
    pub state: State,
}

impl<E> Phenotype<E> {
    /// Wraps an entity with unset fitness and empty state.
    pub fn new(entity: E) -> Self {
        Self {
            fitness: None,
            entity,
            state: State::new(),
        }
    }

    /// Returns `true` once the individual carries a usable fitness value.
    pub fn is_evaluated(&self) -> bool {
        matches!(self.fitness, Some(f) if !f.is_nan())
    }
}

impl<E: Clone> Phenotype<E> {
    /// Copy of this individual with fitness and state reset.
    ///
    /// Used for elites: the entity survives, its score does not.
    pub fn reborn(&self) -> Self {
        Self::new(self.entity.clone())
    }
}

/// Result of the fitness callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub fitness: f64,
    pub state: Option<State>,
}

impl Evaluation {
    /// An evaluation with no auxiliary state.
    pub fn new(fitness: f64) -> Self {
        Self {
            fitness,
            state: None,
        }
    }

    /// Attaches auxiliary state.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }
}

impl From<f64> for Evaluation {
    fn from(fitness: f64) -> Self {
        Self::new(fitness)
    }
}

/// Creates a random entity.
pub type RandomFn<E> = Arc<dyn Fn(&mut dyn RngCore) -> E + Send + Sync>;

/// Perturbs an entity.
pub type MutationFn<E> = Arc<dyn Fn(E, &mut dyn RngCore) -> E + Send + Sync>;

/// Recombines two parents into zero or more offspring.
pub type CrossoverFn<E> = Arc<dyn Fn(E, E, &mut dyn RngCore) -> Vec<E> + Send + Sync>;

/// Scores an entity. The flag is `true` for the last individual of the
/// generation being estimated.
pub type FitnessFn<E> = Arc<dyn Fn(&E, bool) -> Evaluation + Send + Sync>;

/// Returns `false` for entities that must not enter the population.
pub type DeduplicateFn<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// `optimize(a, b)` holds when `a` is at least as fit as `b`.
pub struct Optimize<E>(Arc<dyn Fn(&Phenotype<E>, &Phenotype<E>) -> bool + Send + Sync>);

impl<E> Optimize<E> {
    /// Wraps a custom "at least as fit" predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Phenotype<E>, &Phenotype<E>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Higher fitness is better (`a.fitness >= b.fitness`).
    pub fn maximize() -> Self
    where
        E: 'static,
    {
        Self::new(|a, b| fitness_of(a) >= fitness_of(b))
    }

    /// Lower fitness is better (`a.fitness <= b.fitness`).
    pub fn minimize() -> Self
    where
        E: 'static,
    {
        Self::new(|a, b| fitness_of(a) <= fitness_of(b))
    }

    /// Whether `a` is at least as fit as `b`.
    pub fn is_fitter(&self, a: &Phenotype<E>, b: &Phenotype<E>) -> bool {
        (self.0)(a, b)
    }

    /// Rank ordering derived from the predicate (fitter first).
    ///
    /// `optimize` is not required to be strict, so a pair that holds both
    /// ways is a tie and keeps its input order under a stable sort.
    pub fn ordering(&self, a: &Phenotype<E>, b: &Phenotype<E>) -> Ordering {
        match (self.is_fitter(a, b), self.is_fitter(b, a)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    /// Stable-sorts `population` best first.
    pub fn rank(&self, population: &mut [Phenotype<E>]) {
        population.sort_by(|a, b| self.ordering(a, b));
    }
}

impl<E> Clone for Optimize<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> fmt::Debug for Optimize<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Optimize(..)")
    }
}

/// Unset fitness compares as NaN, which never wins a `>=`/`<=` test.
fn fitness_of<E>(p: &Phenotype<E>) -> f64 {
    p.fitness.unwrap_or(f64::NAN)
}
