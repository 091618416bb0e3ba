//! Per-generation population statistics.

use super::types::Phenotype;
use serde::{Deserialize, Serialize};

/// Summary of one estimated generation.
///
/// Fitness figures are rounded to 4 decimal places. `maximum` and `minimum`
/// are read from the two ends of the ranked population, so they follow the
/// configured comparator rather than numeric order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of evaluated individuals.
    ///
    /// Kept as `f64` so island statistics can be averaged field by field.
    pub population: f64,
    pub maximum: f64,
    pub minimum: f64,
    pub average: f64,
    /// Population (not sample) standard deviation.
    pub std_dev: f64,
}

impl Stats {
    /// Computes statistics from a ranked population.
    ///
    /// Individuals without fitness are ignored. An empty population yields
    /// all-zero statistics.
    pub fn from_ranked<E>(population: &[Phenotype<E>]) -> Self {
        let fitness: Vec<f64> = population
            .iter()
            .filter_map(|p| p.fitness)
            .filter(|f| !f.is_nan())
            .collect();

        let (Some(&first), Some(&last)) = (fitness.first(), fitness.last()) else {
            return Self::default();
        };

        let n = fitness.len() as f64;
        let mean = round4(fitness.iter().sum::<f64>() / n);
        let variance = fitness.iter().map(|f| (f - mean) * (f - mean)).sum::<f64>() / n;

        Self {
            population: n,
            maximum: round4(first),
            minimum: round4(last),
            average: mean,
            std_dev: round4(variance.sqrt()),
        }
    }

    /// Field-by-field arithmetic mean.
    pub fn mean_of(stats: &[Stats]) -> Self {
        if stats.is_empty() {
            return Self::default();
        }
        let n = stats.len() as f64;
        let sum = |f: fn(&Stats) -> f64| stats.iter().map(f).sum::<f64>() / n;

        Self {
            population: sum(|s| s.population),
            maximum: sum(|s| s.maximum),
            minimum: sum(|s| s.minimum),
            average: sum(|s| s.average),
            std_dev: sum(|s| s.std_dev),
        }
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
