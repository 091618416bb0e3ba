//! Island model execution.
//!
//! [`IslandModel`] runs several [`Genetic`] populations side by side. Each
//! breed cycle starts with a migration pass; on a configurable cadence the
//! islands are pooled into one continent, bred together for a few rounds,
//! and dealt back round-robin.

use super::config::IslandConfig;
use crate::error::{EvoResult, EvolutionError};
use crate::genetic::{Genetic, GeneticConfig, Optimize, Phenotype, SelectionState, Stats};
use crate::random::{create_rng, derive_seed};
use crate::Evolver;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::Rng;

/// Island model coordinator.
///
/// # Usage
///
/// ```ignore
/// let mut model = IslandModel::new(
///     IslandConfig::default().with_continent(10, 5),
///     genetic_config,
/// )?;
/// model.seed(Vec::new())?;
/// for _ in 0..200 {
///     model.estimate();
///     model.breed()?;
/// }
/// ```
pub struct IslandModel<E> {
    config: IslandConfig<E>,
    optimize: Optimize<E>,
    islands: Vec<Genetic<E>>,
    continent: Genetic<E>,
    on_continent: bool,
    migration: SelectionState,
    rng: StdRng,
    generation: usize,
}

impl<E: Clone + Send + Sync> IslandModel<E> {
    /// Creates the islands and the (empty) continent.
    ///
    /// Every island gets `round(population_size / island_count)` slots and
    /// the island mutation/crossover probabilities. The continent uses
    /// `genetic` unchanged.
    pub fn new(config: IslandConfig<E>, genetic: GeneticConfig<E>) -> EvoResult<Self> {
        config.validate()?;
        genetic.validate()?;

        let island_size =
            (genetic.population_size as f64 / config.island_count as f64).round() as usize;
        if island_size == 0 {
            return Err(EvolutionError::InvalidConfig(format!(
                "population_size {} is too small for {} islands",
                genetic.population_size, config.island_count
            )));
        }

        let islands = (0..config.island_count)
            .map(|i| {
                let mut island = genetic
                    .clone()
                    .with_population_size(island_size)
                    .with_mutate_probability(config.island_mutation_probability)
                    .with_crossover_probability(config.island_crossover_probability);
                island.fittest_n_survives = island.fittest_n_survives.min(island_size);
                island.seed = derive_seed(genetic.seed, i);
                Genetic::new(island)
            })
            .collect::<EvoResult<Vec<_>>>()?;

        let optimize = genetic.optimize.clone();
        let mut continent = genetic;
        continent.seed = derive_seed(continent.seed, config.island_count);
        let continent = Genetic::new(continent)?;
        let rng = create_rng(config.seed);

        debug!(
            "island model: {} islands of {} individuals",
            config.island_count, island_size
        );

        Ok(Self {
            config,
            optimize,
            islands,
            continent,
            on_continent: false,
            migration: SelectionState::default(),
            rng,
            generation: 0,
        })
    }

    /// Seeds every island with the same initial entities, each island
    /// keeping at most its own population size of them.
    pub fn seed(&mut self, entities: Vec<E>) -> EvoResult<()> {
        self.continent.take_population();
        self.on_continent = false;
        self.generation = 0;

        for island in &mut self.islands {
            island.seed(entities.clone())?;
        }
        Ok(())
    }

    /// Estimates each island in turn (or the continent while it holds the
    /// population).
    pub fn estimate(&mut self) {
        self.migration.reset();

        if self.on_continent {
            self.continent.estimate();
            return;
        }
        for island in &mut self.islands {
            island.estimate();
        }
    }

    /// Runs one breed cycle.
    ///
    /// While the population sits on the continent after a manual
    /// [`move_all_to_continent`](Self::move_all_to_continent), only the
    /// continent is bred. Otherwise a migration pass runs first, then either
    /// every island breeds on its own or, on the consolidation cadence, the
    /// continent phase runs.
    ///
    /// # Errors
    /// Propagates [`EvolutionError::PopulationFill`] from any population. If
    /// it happens during a consolidation phase the individuals stay on the
    /// continent; [`migrate_to_islands`](Self::migrate_to_islands) returns
    /// them.
    pub fn breed(&mut self) -> EvoResult<()> {
        if self.on_continent {
            return self.continent.breed();
        }

        self.migration();
        self.generation += 1;

        match self.config.continent_cross_generation {
            Some(every) if self.generation % every == 0 => self.continental_breed(),
            _ => {
                for island in &mut self.islands {
                    island.breed()?;
                }
                Ok(())
            }
        }
    }

    /// Moves individuals between islands.
    ///
    /// Every slot of every island is visited; with `migration_probability`
    /// an individual chosen by the migration strategy leaves for another
    /// island picked uniformly at random. Islands are re-sorted afterwards.
    /// The total count is preserved, per-island sizes may drift.
    pub fn migration(&mut self) {
        let count = self.islands.len();
        if count < 2 {
            return;
        }

        let mut moved = 0;
        for source in 0..count {
            let mut slot = 0;
            while slot < self.islands[source].population().len() {
                slot += 1;
                if self.rng.random::<f64>() >= self.config.migration_probability {
                    continue;
                }

                let idx = self.config.migration_selection.select(
                    self.islands[source].population(),
                    &self.optimize,
                    &mut self.migration,
                    &mut self.rng,
                );
                let migrant = self.islands[source].population_mut().remove(idx);
                let target = self.random_island(source);
                trace!("migrating rank {idx} from island {source} to island {target}");
                self.islands[target].population_mut().push(migrant);
                moved += 1;
            }
        }

        for island in &mut self.islands {
            self.optimize.rank(island.population_mut());
        }
        debug!("migration moved {moved} individuals");
    }

    /// Pools every island into the continent. No-op if already pooled.
    pub fn move_all_to_continent(&mut self) {
        if self.on_continent {
            return;
        }

        let mut pooled = Vec::new();
        for island in &mut self.islands {
            pooled.append(&mut island.take_population());
        }
        self.optimize.rank(&mut pooled);

        info!("{} individuals moved to the continent", pooled.len());
        self.continent.set_population(pooled);
        self.on_continent = true;
    }

    /// Deals the continent's individuals back to the islands, one at a time
    /// from the tail of the continent, in rotating island order.
    pub fn migrate_to_islands(&mut self) {
        let mut pooled = self.continent.take_population();
        info!("{} individuals moved back to the islands", pooled.len());

        let count = self.islands.len();
        let mut active = 0;
        while let Some(phenotype) = pooled.pop() {
            self.islands[active].population_mut().push(phenotype);
            active = (active + 1) % count;
        }
        self.on_continent = false;
    }

    /// Best individuals across the model.
    ///
    /// On the continent this is the continent's ranking. Otherwise islands
    /// contribute round-robin (their best, then their second best, …) until
    /// `max(island_count, count)` individuals are gathered or every island is
    /// exhausted; the result is sorted under the comparator.
    pub fn best(&self, count: usize) -> Vec<Phenotype<E>> {
        if self.on_continent {
            return self.continent.best(count);
        }

        let n = self.islands.len();
        let target = count.max(n);
        let mut cursors = vec![0usize; n];
        let mut results = Vec::with_capacity(target);
        let mut active = 0;
        let mut empty_streak = 0;

        while results.len() < target && empty_streak < n {
            match self.islands[active].population().get(cursors[active]) {
                Some(phenotype) => {
                    results.push(phenotype.clone());
                    cursors[active] += 1;
                    empty_streak = 0;
                }
                None => empty_streak += 1,
            }
            active = (active + 1) % n;
        }

        self.optimize.rank(&mut results);
        results
    }

    /// Statistics: the continent's, or the field-by-field mean of the
    /// islands'.
    pub fn stats(&self) -> Stats {
        if self.on_continent {
            return self.continent.stats();
        }
        let stats: Vec<Stats> = self.islands.iter().map(Genetic::stats).collect();
        Stats::mean_of(&stats)
    }

    /// Every individual currently held, island by island.
    pub fn population(&self) -> Vec<Phenotype<E>> {
        if self.on_continent {
            return self.continent.population().to_vec();
        }
        self.islands
            .iter()
            .flat_map(|island| island.population().iter().cloned())
            .collect()
    }

    /// The island populations, in island order.
    pub fn islands(&self) -> &[Genetic<E>] {
        &self.islands
    }

    /// The continent engine. Empty unless it holds the population.
    pub fn continent(&self) -> &Genetic<E> {
        &self.continent
    }

    /// Whether the continent currently holds the population.
    pub fn is_on_continent(&self) -> bool {
        self.on_continent
    }

    /// Number of completed island breed cycles since the last `seed()`.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The island configuration.
    pub fn config(&self) -> &IslandConfig<E> {
        &self.config
    }

    fn continental_breed(&mut self) -> EvoResult<()> {
        info!("generation {}: continental breed", self.generation);
        self.move_all_to_continent();

        self.continent.breed()?;
        for _ in 0..self.config.continent_generations {
            self.continent.estimate();
            self.continent.breed()?;
        }

        self.migrate_to_islands();
        Ok(())
    }

    /// Uniformly random island other than `exclude`.
    fn random_island(&mut self, exclude: usize) -> usize {
        loop {
            let target = self.rng.random_range(0..self.islands.len());
            if target != exclude {
                return target;
            }
        }
    }
}

impl<E: Clone + Send + Sync> Evolver<E> for IslandModel<E> {
    fn seed(&mut self, entities: Vec<E>) -> EvoResult<()> {
        IslandModel::seed(self, entities)
    }

    fn estimate(&mut self) {
        IslandModel::estimate(self)
    }

    fn breed(&mut self) -> EvoResult<()> {
        IslandModel::breed(self)
    }

    fn best(&self, count: usize) -> Vec<Phenotype<E>> {
        IslandModel::best(self, count)
    }

    fn stats(&self) -> Stats {
        IslandModel::stats(self)
    }

    fn population(&self) -> Vec<Phenotype<E>> {
        IslandModel::population(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
