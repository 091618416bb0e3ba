//! Island model configuration.

use crate::error::{EvoResult, EvolutionError};
use crate::genetic::Selection;

/// Configuration for the island model.
///
/// The per-population callbacks and parameters come from a
/// [`GeneticConfig`](crate::genetic::GeneticConfig); this struct only holds
/// what is specific to running several populations side by side.
///
/// # Defaults
///
/// ```
/// use u_genetic::island::IslandConfig;
///
/// let config = IslandConfig::<u32>::default();
/// assert_eq!(config.island_count, 6);
/// assert_eq!(config.continent_cross_generation, None);
/// ```
pub struct IslandConfig<E> {
    /// Number of islands. The total population is split evenly across them.
    pub island_count: usize,

    /// Mutation probability used on islands (0.0–1.0).
    ///
    /// Usually higher than on the continent: each island is a small,
    /// specialised environment.
    pub island_mutation_probability: f64,

    /// Crossover probability used on islands (0.0–1.0).
    pub island_crossover_probability: f64,

    /// Per-slot probability that an individual leaves its island during a
    /// migration pass (0.0–1.0).
    pub migration_probability: f64,

    /// Strategy picking which individual migrates.
    pub migration_selection: Selection<E>,

    /// Run a consolidation phase every this many breed cycles.
    ///
    /// `None` disables the continent.
    pub continent_cross_generation: Option<usize>,

    /// Extra estimate/breed rounds on the continent per consolidation phase.
    pub continent_generations: usize,

    /// Seed for the migration RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl<E> Default for IslandConfig<E> {
    fn default() -> Self {
        Self {
            island_count: 6,
            island_mutation_probability: 0.5,
            island_crossover_probability: 0.8,
            migration_probability: 0.05,
            migration_selection: Selection::Random,
            continent_cross_generation: None,
            continent_generations: 5,
            seed: None,
        }
    }
}

impl<E> IslandConfig<E> {
    /// Sets the number of islands.
    pub fn with_island_count(mut self, n: usize) -> Self {
        self.island_count = n;
        self
    }

    /// Sets the island mutation probability.
    pub fn with_island_mutation_probability(mut self, p: f64) -> Self {
        self.island_mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the island crossover probability.
    pub fn with_island_crossover_probability(mut self, p: f64) -> Self {
        self.island_crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the migration probability.
    pub fn with_migration_probability(mut self, p: f64) -> Self {
        self.migration_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the migrant selection strategy.
    pub fn with_migration_selection(mut self, sel: Selection<E>) -> Self {
        self.migration_selection = sel;
        self
    }

    /// Enables periodic consolidation: every `cross_generation` cycles the
    /// islands merge into one continent for `generations` extra rounds.
    pub fn with_continent(mut self, cross_generation: usize, generations: usize) -> Self {
        self.continent_cross_generation = Some(cross_generation);
        self.continent_generations = generations;
        self
    }

    /// Sets the migration RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EvoResult<()> {
        if self.island_count == 0 {
            return Err(invalid("island_count must be at least 1"));
        }
        for (name, p) in [
            ("island_mutation_probability", self.island_mutation_probability),
            ("island_crossover_probability", self.island_crossover_probability),
            ("migration_probability", self.migration_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(&format!("{name} must be within [0, 1]")));
            }
        }
        if self.continent_cross_generation == Some(0) {
            return Err(invalid("continent_cross_generation must be positive or None"));
        }
        Ok(())
    }
}

impl<E> Clone for IslandConfig<E> {
    fn clone(&self) -> Self {
        Self {
            island_count: self.island_count,
            island_mutation_probability: self.island_mutation_probability,
            island_crossover_probability: self.island_crossover_probability,
            migration_probability: self.migration_probability,
            migration_selection: self.migration_selection.clone(),
            continent_cross_generation: self.continent_cross_generation,
            continent_generations: self.continent_generations,
            seed: self.seed,
        }
    }
}

impl<E> std::fmt::Debug for IslandConfig<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IslandConfig")
            .field("island_count", &self.island_count)
            .field("island_mutation_probability", &self.island_mutation_probability)
            .field("island_crossover_probability", &self.island_crossover_probability)
            .field("migration_probability", &self.migration_probability)
            .field("migration_selection", &self.migration_selection)
            .field("continent_cross_generation", &self.continent_cross_generation)
            .field("continent_generations", &self.continent_generations)
            .field("seed", &self.seed)
            .finish()
    }
}

fn invalid(msg: &str) -> EvolutionError {
    EvolutionError::InvalidConfig(msg.into())
}
