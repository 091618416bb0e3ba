//! Single-population evolution.
//!
//! [`Genetic`] owns one population and drives its lifecycle:
//! seed → estimate → breed → estimate → breed → …
//!
//! The caller decides when to stop; the engine only guarantees that after
//! every `seed()` / `breed()` the population holds exactly
//! `population_size` individuals, or an error is returned.

use super::config::GeneticConfig;
use super::selection::SelectionState;
use super::stats::Stats;
use super::types::{Evaluation, Phenotype};
use crate::error::{EvoResult, EvolutionError};
use crate::random::create_rng;
use crate::Evolver;
use log::{debug, error, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Retries when `select2` returns the same parent twice.
const PAIR_RETRIES: usize = 10;

/// The population manager.
///
/// # Usage
///
/// ```ignore
/// let mut genetic = Genetic::new(config)?;
/// genetic.seed(Vec::new())?;
/// for _ in 0..100 {
///     genetic.estimate();
///     println!("best: {:?}", genetic.best(1)[0].fitness);
///     genetic.breed()?;
/// }
/// ```
pub struct Genetic<E> {
    config: GeneticConfig<E>,
    population: Vec<Phenotype<E>>,
    stats: Stats,
    selection: SelectionState,
    rng: StdRng,
    generation: usize,
}

impl<E: Clone + Send + Sync> Genetic<E> {
    /// Creates an engine with an empty population.
    pub fn new(config: GeneticConfig<E>) -> EvoResult<Self> {
        config.validate()?;
        let rng = create_rng(config.seed);

        Ok(Self {
            config,
            population: Vec::new(),
            stats: Stats::default(),
            selection: SelectionState::default(),
            rng,
            generation: 0,
        })
    }

    /// Starts a population from `entities`, topped up with random ones.
    ///
    /// Entities beyond `population_size` are discarded.
    ///
    /// # Errors
    /// [`EvolutionError::PopulationFill`] if the random callback (filtered
    /// through `deduplicate`) cannot reach `population_size` within
    /// `population_size × 10` attempts. The current population is left
    /// untouched.
    pub fn seed(&mut self, entities: Vec<E>) -> EvoResult<()> {
        let mut population: Vec<Phenotype<E>> = entities
            .into_iter()
            .take(self.config.population_size)
            .map(Phenotype::new)
            .collect();
        self.fill(&mut population)?;

        self.population = population;
        self.generation = 0;
        Ok(())
    }

    /// Scores the whole population, then ranks it best first.
    ///
    /// All evaluations complete before any result is written back. Individuals
    /// whose fitness is NaN are dropped.
    pub fn estimate(&mut self) {
        self.selection.reset();

        let evaluations = self.evaluate_all();
        for (phenotype, evaluation) in self.population.iter_mut().zip(evaluations) {
            phenotype.fitness = Some(evaluation.fitness);
            phenotype.state = evaluation.state.unwrap_or_default();
        }

        self.rank();
        self.stats = Stats::from_ranked(&self.population);

        debug!(
            "generation {}: {} individuals, best {:?}, mean {}",
            self.generation,
            self.population.len(),
            self.population.first().and_then(|p| p.fitness),
            self.stats.average
        );
    }

    /// Produces the next generation.
    ///
    /// Elites are carried over first, then offspring are produced by
    /// crossover or cloning (each optionally mutated), filtered through
    /// `deduplicate`, and the result is trimmed or topped up to exactly
    /// `population_size`. Every individual of the new generation is
    /// unevaluated.
    ///
    /// # Errors
    /// [`EvolutionError::PopulationFill`] if the final top-up cannot reach
    /// `population_size`. The current population is left untouched.
    pub fn breed(&mut self) -> EvoResult<()> {
        let size = self.config.population_size;
        let max_attempts = self.config.max_attempts();

        let elites: Vec<Phenotype<E>> = self
            .population
            .iter()
            .take(self.config.fittest_n_survives)
            .map(Phenotype::reborn)
            .collect();

        let mut offspring: Vec<Phenotype<E>> = Vec::with_capacity(size);
        let mut attempts = 0;
        if !self.population.is_empty() {
            while offspring.len() < size && attempts < max_attempts {
                offspring.extend(self.produce().into_iter().map(Phenotype::new));
                attempts += 1;
            }
            if offspring.len() < size {
                warn!(
                    "breeding produced {}/{} offspring in {} attempts; filling randomly",
                    offspring.len(),
                    size,
                    attempts
                );
            }
        }

        if let Some(deduplicate) = &self.config.deduplicate {
            offspring.retain(|p| deduplicate(&p.entity));
        }

        let mut next = elites;
        next.append(&mut offspring);
        next.truncate(size);
        self.fill(&mut next)?;

        self.population = next;
        self.generation += 1;
        Ok(())
    }

    /// The first `count` individuals in the current order.
    pub fn best(&self, count: usize) -> Vec<Phenotype<E>> {
        self.population.iter().take(count).cloned().collect()
    }

    /// Drops unevaluated individuals and re-sorts under the comparator,
    /// without calling the fitness callback.
    pub fn rank(&mut self) {
        self.population.retain(Phenotype::is_evaluated);
        self.config.optimize.rank(&mut self.population);
    }

    /// Current population (ranked after `estimate()`).
    pub fn population(&self) -> &[Phenotype<E>] {
        &self.population
    }

    /// Mutable access for callers that move individuals between engines.
    pub fn population_mut(&mut self) -> &mut Vec<Phenotype<E>> {
        &mut self.population
    }

    /// Empties the population and returns its individuals.
    pub fn take_population(&mut self) -> Vec<Phenotype<E>> {
        std::mem::take(&mut self.population)
    }

    /// Replaces the population.
    pub fn set_population(&mut self, population: Vec<Phenotype<E>>) {
        self.population = population;
    }

    /// Statistics of the last `estimate()`.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &GeneticConfig<E> {
        &self.config
    }

    /// Number of completed `breed()` calls since the last `seed()`.
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn evaluate_all(&self) -> Vec<Evaluation> {
        let fitness = &self.config.fitness;
        let last = self.population.len().saturating_sub(1);

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return self
                    .population
                    .par_iter()
                    .enumerate()
                    .map(|(i, p)| fitness(&p.entity, i == last))
                    .collect();
            }
        }

        self.population
            .iter()
            .enumerate()
            .map(|(i, p)| fitness(&p.entity, i == last))
            .collect()
    }

    /// One production attempt: crossover of two parents, or a clone of one,
    /// each result possibly mutated. May return nothing.
    fn produce(&mut self) -> Vec<E> {
        let crossover = match &self.config.crossover {
            Some(f) if self.rng.random::<f64>() < self.config.crossover_probability => {
                Some(Arc::clone(f))
            }
            _ => None,
        };

        let children = match crossover {
            Some(crossover) => {
                let (a, b) = self.select_pair();
                crossover(a, b, &mut self.rng)
            }
            None => vec![self.select_one()],
        };

        children
            .into_iter()
            .map(|child| self.try_mutate(child))
            .collect()
    }

    fn try_mutate(&mut self, entity: E) -> E {
        match &self.config.mutation {
            Some(mutation) if self.rng.random::<f64>() < self.config.mutate_probability => {
                mutation(entity, &mut self.rng)
            }
            _ => entity,
        }
    }

    fn select_one(&mut self) -> E {
        let idx = self.config.select1.select(
            &self.population,
            &self.config.optimize,
            &mut self.selection,
            &mut self.rng,
        );
        self.population[idx].entity.clone()
    }

    /// Two parents via `select2`. The second draw is retried a few times if
    /// it hits the first parent; distinctness is not guaranteed.
    fn select_pair(&mut self) -> (E, E) {
        let select2 = &self.config.select2;
        let optimize = &self.config.optimize;
        let first = select2.select(&self.population, optimize, &mut self.selection, &mut self.rng);

        let mut second = first;
        if self.population.len() > 1 {
            second = select2.select(&self.population, optimize, &mut self.selection, &mut self.rng);
            let mut retries = 0;
            while second == first && retries < PAIR_RETRIES {
                second =
                    select2.select(&self.population, optimize, &mut self.selection, &mut self.rng);
                retries += 1;
            }
        }

        (
            self.population[first].entity.clone(),
            self.population[second].entity.clone(),
        )
    }

    /// Tops `population` up to `population_size` with random entities.
    fn fill(&mut self, population: &mut Vec<Phenotype<E>>) -> EvoResult<()> {
        let size = self.config.population_size;
        let max_attempts = self.config.max_attempts();
        let mut attempts = 0;

        while population.len() < size && attempts < max_attempts {
            attempts += 1;
            let entity = (self.config.random)(&mut self.rng);
            if let Some(deduplicate) = &self.config.deduplicate {
                if !deduplicate(&entity) {
                    continue;
                }
            }
            population.push(Phenotype::new(entity));
        }

        if population.len() < size {
            error!(
                "population stuck at {}/{} after {} fill attempts",
                population.len(),
                size,
                attempts
            );
            return Err(EvolutionError::PopulationFill {
                required: size,
                produced: population.len(),
                attempts,
            });
        }
        Ok(())
    }
}

impl<E: Clone + Send + Sync> Evolver<E> for Genetic<E> {
    fn seed(&mut self, entities: Vec<E>) -> EvoResult<()> {
        Genetic::seed(self, entities)
    }

    fn estimate(&mut self) {
        Genetic::estimate(self)
    }

    fn breed(&mut self) -> EvoResult<()> {
        Genetic::breed(self)
    }

    fn best(&self, count: usize) -> Vec<Phenotype<E>> {
        Genetic::best(self, count)
    }

    fn stats(&self) -> Stats {
        Genetic::stats(self)
    }

    fn population(&self) -> Vec<Phenotype<E>> {
        self.population.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
