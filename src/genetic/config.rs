//! Genetic engine configuration.
//!
//! [`GeneticConfig`] holds the user callbacks and every parameter that
//! controls one population. It is consumed by [`Genetic::new`] and cannot be
//! changed afterwards.
//!
//! [`Genetic::new`]: super::Genetic::new

use super::selection::Selection;
use super::types::{
    CrossoverFn, DeduplicateFn, Evaluation, FitnessFn, MutationFn, Optimize, Phenotype, RandomFn,
};
use crate::error::{EvoResult, EvolutionError};
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Configuration for a single population.
///
/// # Defaults
///
/// | Option | Default |
/// |---|---|
/// | `mutate_probability` | 0.2 |
/// | `crossover_probability` | 0.9 |
/// | `fittest_n_survives` | 1 |
/// | `select1` | [`Selection::Fittest`] |
/// | `select2` | [`Selection::Tournament2`] |
/// | `optimize` | higher fitness wins |
/// | `parallel` | `true` |
///
/// # Builder Pattern
///
/// ```
/// use u_genetic::genetic::{Evaluation, GeneticConfig, Selection};
/// use rand::Rng;
///
/// let config = GeneticConfig::new(
///     50,
///     |rng| rng.random_range(0..100u32),
///     |x: &u32, _is_last| Evaluation::new(*x as f64),
/// )
/// .with_mutation(|x, rng| x ^ rng.random_range(1..8u32))
/// .with_select2(Selection::Tournament3)
/// .with_fittest_n_survives(2);
///
/// assert!(config.validate().is_ok());
/// ```
pub struct GeneticConfig<E> {
    /// Number of individuals after every `seed()` / `breed()`.
    pub population_size: usize,

    /// Probability of mutating each offspring (0.0–1.0).
    pub mutate_probability: f64,

    /// Probability of producing offspring by crossover (0.0–1.0).
    ///
    /// When crossover is not applied, a clone of one selected parent is used.
    pub crossover_probability: f64,

    /// Number of top-ranked individuals copied unchanged into the next
    /// generation.
    pub fittest_n_survives: usize,

    /// Selection used when a single parent is needed.
    pub select1: Selection<E>,

    /// Selection used for both parents of a crossover.
    pub select2: Selection<E>,

    /// "At least as fit as" comparator that defines the ranking.
    pub optimize: Optimize<E>,

    /// Whether to evaluate fitness in parallel using rayon.
    ///
    /// Ignored when the `parallel` feature is disabled.
    pub parallel: bool,

    /// Random seed for the engine RNG. `None` seeds from the OS.
    pub seed: Option<u64>,

    pub(crate) random: RandomFn<E>,
    pub(crate) fitness: FitnessFn<E>,
    pub(crate) mutation: Option<MutationFn<E>>,
    pub(crate) crossover: Option<CrossoverFn<E>>,
    pub(crate) deduplicate: Option<DeduplicateFn<E>>,
}

impl<E: 'static> GeneticConfig<E> {
    /// Creates a configuration from the two mandatory callbacks.
    pub fn new<R, F>(population_size: usize, random: R, fitness: F) -> Self
    where
        R: Fn(&mut dyn RngCore) -> E + Send + Sync + 'static,
        F: Fn(&E, bool) -> Evaluation + Send + Sync + 'static,
    {
        Self {
            population_size,
            mutate_probability: 0.2,
            crossover_probability: 0.9,
            fittest_n_survives: 1,
            select1: Selection::Fittest,
            select2: Selection::Tournament2,
            optimize: Optimize::maximize(),
            parallel: true,
            seed: None,
            random: Arc::new(random),
            fitness: Arc::new(fitness),
            mutation: None,
            crossover: None,
            deduplicate: None,
        }
    }
}

impl<E> GeneticConfig<E> {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the mutation callback.
    pub fn with_mutation<F>(mut self, f: F) -> Self
    where
        F: Fn(E, &mut dyn RngCore) -> E + Send + Sync + 'static,
    {
        self.mutation = Some(Arc::new(f));
        self
    }

    /// Sets the crossover callback.
    pub fn with_crossover<F>(mut self, f: F) -> Self
    where
        F: Fn(E, E, &mut dyn RngCore) -> Vec<E> + Send + Sync + 'static,
    {
        self.crossover = Some(Arc::new(f));
        self
    }

    /// Sets the deduplicate predicate (`false` rejects the entity).
    pub fn with_deduplicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.deduplicate = Some(Arc::new(f));
        self
    }

    /// Sets the ranking comparator.
    pub fn with_optimize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Phenotype<E>, &Phenotype<E>) -> bool + Send + Sync + 'static,
    {
        self.optimize = Optimize::new(f);
        self
    }

    /// Sets the ranking comparator from a prebuilt [`Optimize`].
    pub fn with_optimizer(mut self, optimize: Optimize<E>) -> Self {
        self.optimize = optimize;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutate_probability(mut self, p: f64) -> Self {
        self.mutate_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of elites.
    pub fn with_fittest_n_survives(mut self, n: usize) -> Self {
        self.fittest_n_survives = n;
        self
    }

    /// Sets the single-parent selection.
    pub fn with_select1(mut self, sel: Selection<E>) -> Self {
        self.select1 = sel;
        self
    }

    /// Sets the crossover-parent selection.
    pub fn with_select2(mut self, sel: Selection<E>) -> Self {
        self.select2 = sel;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether a mutation callback is configured.
    pub fn has_mutation(&self) -> bool {
        self.mutation.is_some()
    }

    /// Whether a crossover callback is configured.
    pub fn has_crossover(&self) -> bool {
        self.crossover.is_some()
    }

    /// Whether a deduplicate predicate is configured.
    pub fn has_deduplicate(&self) -> bool {
        self.deduplicate.is_some()
    }

    /// Upper bound on production attempts for one fill or breed pass.
    pub fn max_attempts(&self) -> usize {
        self.population_size.saturating_mul(10)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if self.fittest_n_survives > self.population_size {
            return Err(invalid("fittest_n_survives exceeds population_size"));
        }
        if !(0.0..=1.0).contains(&self.mutate_probability) {
            return Err(invalid("mutate_probability must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(invalid("crossover_probability must be within [0, 1]"));
        }
        Ok(())
    }
}

impl<E> Clone for GeneticConfig<E> {
    fn clone(&self) -> Self {
        Self {
            population_size: self.population_size,
            mutate_probability: self.mutate_probability,
            crossover_probability: self.crossover_probability,
            fittest_n_survives: self.fittest_n_survives,
            select1: self.select1.clone(),
            select2: self.select2.clone(),
            optimize: self.optimize.clone(),
            parallel: self.parallel,
            seed: self.seed,
            random: Arc::clone(&self.random),
            fitness: Arc::clone(&self.fitness),
            mutation: self.mutation.clone(),
            crossover: self.crossover.clone(),
            deduplicate: self.deduplicate.clone(),
        }
    }
}

impl<E> fmt::Debug for GeneticConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneticConfig")
            .field("population_size", &self.population_size)
            .field("mutate_probability", &self.mutate_probability)
            .field("crossover_probability", &self.crossover_probability)
            .field("fittest_n_survives", &self.fittest_n_survives)
            .field("select1", &self.select1)
            .field("select2", &self.select2)
            .field("parallel", &self.parallel)
            .field("seed", &self.seed)
            .field("mutation", &self.has_mutation())
            .field("crossover", &self.has_crossover())
            .field("deduplicate", &self.has_deduplicate())
            .finish()
    }
}

fn invalid(msg: &str) -> EvolutionError {
    EvolutionError::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn base() -> GeneticConfig<u32> {
        GeneticConfig::new(
            20,
            |rng| rng.random_range(0..1000),
            |x: &u32, _| Evaluation::new(*x as f64),
        )
    }

    #[test]
    fn test_default_config() {
        let config = base();
        assert_eq!(config.population_size, 20);
        assert!((config.mutate_probability - 0.2).abs() < 1e-10);
        assert!((config.crossover_probability - 0.9).abs() < 1e-10);
        assert_eq!(config.fittest_n_survives, 1);
        assert!(matches!(config.select1, Selection::Fittest));
        assert!(matches!(config.select2, Selection::Tournament2));
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(!config.has_mutation());
        assert!(!config.has_crossover());
        assert!(!config.has_deduplicate());
        assert_eq!(config.max_attempts(), 200);
    }

    #[test]
    fn test_builder_pattern() {
        let config = base()
            .with_population_size(40)
            .with_mutate_probability(0.6)
            .with_crossover_probability(0.8)
            .with_fittest_n_survives(2)
            .with_select1(Selection::FittestLinear)
            .with_select2(Selection::Tournament3)
            .with_mutation(|x, _| x + 1)
            .with_crossover(|a, b, _| vec![a, b])
            .with_deduplicate(|_| true)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 40);
        assert!((config.mutate_probability - 0.6).abs() < 1e-10);
        assert!((config.crossover_probability - 0.8).abs() < 1e-10);
        assert_eq!(config.fittest_n_survives, 2);
        assert!(matches!(config.select1, Selection::FittestLinear));
        assert!(matches!(config.select2, Selection::Tournament3));
        assert!(config.has_mutation());
        assert!(config.has_crossover());
        assert!(config.has_deduplicate());
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_clamp_rates() {
        let config = base()
            .with_mutate_probability(1.5)
            .with_crossover_probability(-0.5);
        assert!((config.mutate_probability - 1.0).abs() < 1e-10);
        assert!(config.crossover_probability.abs() < 1e-10);
    }

    #[test]
    fn test_validate_ok() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_population() {
        let err = base().with_population_size(0).validate().unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_too_many_elites() {
        assert!(base().with_fittest_n_survives(21).validate().is_err());
        assert!(base().with_fittest_n_survives(20).validate().is_ok());
    }

    #[test]
    fn test_validate_raw_probability() {
        let mut config = base();
        config.mutate_probability = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_optimize() {
        let config = base().with_optimize(|a, b| a.fitness <= b.fitness);
        let mut a = Phenotype::new(1);
        let mut b = Phenotype::new(2);
        a.fitness = Some(1.0);
        b.fitness = Some(2.0);
        assert!(config.optimize.is_fitter(&a, &b));
        assert!(!config.optimize.is_fitter(&b, &a));
    }

    #[test]
    fn test_clone_shares_callbacks() {
        let config = base().with_mutation(|x, _| x * 2);
        let copy = config.clone();
        assert!(copy.has_mutation());
        assert_eq!(copy.population_size, config.population_size);
    }
}
