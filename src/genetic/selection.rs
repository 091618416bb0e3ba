//! Selection strategies.
//!
//! Every strategy works on a population that is already ranked best first
//! and returns an index into it. The same family is used for parent
//! selection inside [`Genetic`](super::Genetic) and for picking migrants in
//! the island model.
//!
//! Three strategies walk a counter across calls (`FittestLinear`,
//! `Sequential`, `RandomLinearRank`). Those counters live in a
//! [`SelectionState`] owned by whoever drives the selection, and are reset at
//! the start of each generation.

use super::types::{Optimize, Phenotype};
use rand::{Rng, RngCore};
use std::fmt;
use std::sync::Arc;

/// Share of the ranking that [`Selection::FittestRandom`] draws from.
const FITTEST_RANDOM_SHARE: f64 = 0.2;

/// User-provided selection: ranked population in, index out.
pub type CustomSelectFn<E> =
    Arc<dyn Fn(&[Phenotype<E>], &mut dyn RngCore) -> usize + Send + Sync>;

/// Selection strategy for picking an individual from a ranked population.
pub enum Selection<E> {
    /// Always the best individual (rank 0).
    Fittest,

    /// Walks the ranking from the top, one step per call, wrapping to 0.
    FittestLinear,

    /// Uniform pick among the best 20% (at least the best individual).
    FittestRandom,

    /// Uniform pick over the whole population.
    Random,

    /// Walks the whole population cyclically.
    Sequential,

    /// Uniform pick within a window `[0, counter)` that widens by one each
    /// call and restarts once it covers the population.
    RandomLinearRank,

    /// Linear rank weighting: rank `i` has weight `n - i`.
    ///
    /// # Complexity
    /// O(n) per selection
    TrueLinearRank,

    /// Best of two uniform draws under the comparator.
    Tournament2,

    /// Best of three uniform draws under the comparator.
    Tournament3,

    /// Escape hatch for strategies outside the built-in set.
    Custom(CustomSelectFn<E>),
}

impl<E> Selection<E> {
    /// Wraps a custom selection function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Phenotype<E>], &mut dyn RngCore) -> usize + Send + Sync + 'static,
    {
        Selection::Custom(Arc::new(f))
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Selection::Fittest => "fittest",
            Selection::FittestLinear => "fittest-linear",
            Selection::FittestRandom => "fittest-random",
            Selection::Random => "random",
            Selection::Sequential => "sequential",
            Selection::RandomLinearRank => "random-linear-rank",
            Selection::TrueLinearRank => "true-linear-rank",
            Selection::Tournament2 => "tournament-2",
            Selection::Tournament3 => "tournament-3",
            Selection::Custom(_) => "custom",
        }
    }

    /// Selects an index from a ranked, non-empty population.
    ///
    /// A custom function returning an out-of-range index is clamped to the
    /// last individual.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<R: Rng>(
        &self,
        population: &[Phenotype<E>],
        optimize: &Optimize<E>,
        state: &mut SelectionState,
        rng: &mut R,
    ) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        let n = population.len();

        match self {
            Selection::Fittest => 0,
            Selection::FittestLinear => state.fittest_linear.next(n),
            Selection::FittestRandom => {
                let width = ((n as f64 * FITTEST_RANDOM_SHARE).ceil() as usize).clamp(1, n);
                rng.random_range(0..width)
            }
            Selection::Random => rng.random_range(0..n),
            Selection::Sequential => state.sequential.next(n) % n,
            Selection::RandomLinearRank => {
                let width = state.random_linear_rank.next(n).min(n);
                if width == 0 {
                    0
                } else {
                    rng.random_range(0..width)
                }
            }
            Selection::TrueLinearRank => true_linear_rank(n, rng),
            Selection::Tournament2 => {
                let a = rng.random_range(0..n);
                let b = rng.random_range(0..n);
                fitter(population, optimize, a, b)
            }
            Selection::Tournament3 => {
                let a = rng.random_range(0..n);
                let b = rng.random_range(0..n);
                let c = rng.random_range(0..n);
                let best = fitter(population, optimize, a, b);
                fitter(population, optimize, best, c)
            }
            Selection::Custom(f) => f(population, rng as &mut dyn RngCore).min(n - 1),
        }
    }
}

impl<E> Clone for Selection<E> {
    fn clone(&self) -> Self {
        match self {
            Selection::Fittest => Selection::Fittest,
            Selection::FittestLinear => Selection::FittestLinear,
            Selection::FittestRandom => Selection::FittestRandom,
            Selection::Random => Selection::Random,
            Selection::Sequential => Selection::Sequential,
            Selection::RandomLinearRank => Selection::RandomLinearRank,
            Selection::TrueLinearRank => Selection::TrueLinearRank,
            Selection::Tournament2 => Selection::Tournament2,
            Selection::Tournament3 => Selection::Tournament3,
            Selection::Custom(f) => Selection::Custom(Arc::clone(f)),
        }
    }
}

impl<E> fmt::Debug for Selection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-generation counters for the stateful strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    fittest_linear: Cursor,
    sequential: Cursor,
    random_linear_rank: Cursor,
}

impl SelectionState {
    /// Rewinds every counter to 0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor(usize);

impl Cursor {
    /// Current position (restarted at 0 once it reaches `n`), then advance.
    fn next(&mut self, n: usize) -> usize {
        if self.0 >= n {
            self.0 = 0;
        }
        let current = self.0;
        self.0 += 1;
        current
    }
}

fn fitter<E>(population: &[Phenotype<E>], optimize: &Optimize<E>, a: usize, b: usize) -> usize {
    if optimize.is_fitter(&population[a], &population[b]) {
        a
    } else {
        b
    }
}

/// Rank-weighted draw: total weight is `n(n+1)/2`, rank 0 weighs `n`.
fn true_linear_rank<R: Rng>(n: usize, rng: &mut R) -> usize {
    let total = (n * (n + 1)) as f64 / 2.0;
    let mut remaining = rng.random_range(0.0..total);

    for i in 0..n {
        remaining -= (n - i) as f64;
        if remaining <= 0.0 {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic::types::State;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ranked(n: usize) -> Vec<Phenotype<usize>> {
        (0..n)
            .map(|i| Phenotype {
                fitness: Some((n - i) as f64),
                entity: i,
                state: State::new(),
            })
            .collect()
    }

    fn counts(sel: &Selection<usize>, n: usize, draws: usize) -> Vec<usize> {
        let pop = ranked(n);
        let optimize = Optimize::maximize();
        let mut state = SelectionState::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = vec![0usize; n];
        for _ in 0..draws {
            counts[sel.select(&pop, &optimize, &mut state, &mut rng)] += 1;
        }
        counts
    }

    fn sequence(sel: &Selection<usize>, n: usize, calls: usize) -> Vec<usize> {
        let pop = ranked(n);
        let optimize = Optimize::maximize();
        let mut state = SelectionState::default();
        let mut rng = StdRng::seed_from_u64(7);
        (0..calls)
            .map(|_| sel.select(&pop, &optimize, &mut state, &mut rng))
            .collect()
    }

    #[test]
    fn test_fittest_always_top() {
        assert!(sequence(&Selection::Fittest, 5, 20).iter().all(|&i| i == 0));
    }

    #[test]
    fn test_fittest_linear_wraps() {
        assert_eq!(
            sequence(&Selection::FittestLinear, 3, 7),
            vec![0, 1, 2, 0, 1, 2, 0]
        );
    }

    #[test]
    fn test_sequential_wraps() {
        assert_eq!(
            sequence(&Selection::Sequential, 4, 9),
            vec![0, 1, 2, 3, 0, 1, 2, 3, 0]
        );
    }

    #[test]
    fn test_random_linear_rank_window_grows() {
        let picks = sequence(&Selection::RandomLinearRank, 5, 5);
        // window is [0, counter): 0 (empty), 1, 2, 3, 4
        assert_eq!(picks[0], 0);
        assert_eq!(picks[1], 0);
        for (call, &idx) in picks.iter().enumerate().skip(1) {
            assert!(idx < call, "call {call} picked {idx}");
        }
    }

    #[test]
    fn test_fittest_random_stays_in_top_share() {
        let c = counts(&Selection::FittestRandom, 10, 2000);
        assert!(c[0] > 0 && c[1] > 0);
        assert!(c[2..].iter().all(|&x| x == 0), "got {c:?}");
    }

    #[test]
    fn test_random_covers_population() {
        let c = counts(&Selection::Random, 5, 5000);
        for &x in &c {
            assert!(x > 700, "expected roughly uniform, got {c:?}");
        }
    }

    #[test]
    fn test_tournament2_favors_best() {
        let draws = 10_000;
        let c = counts(&Selection::Tournament2, 5, draws);
        assert!(
            c[0] as f64 / draws as f64 > 0.2,
            "best should beat the uniform baseline, got {c:?}"
        );
        assert!(c[0] > c[4]);
    }

    #[test]
    fn test_tournament3_stronger_than_tournament2() {
        let t2 = counts(&Selection::Tournament2, 5, 10_000);
        let t3 = counts(&Selection::Tournament3, 5, 10_000);
        assert!(t3[0] > t2[0], "t2={t2:?} t3={t3:?}");
    }

    #[test]
    fn test_true_linear_rank_weights() {
        let c = counts(&Selection::TrueLinearRank, 4, 20_000);
        // expected shares 4/10, 3/10, 2/10, 1/10
        assert!(c[0] > c[1] && c[1] > c[2] && c[2] > c[3], "got {c:?}");
        let share = c[0] as f64 / 20_000.0;
        assert!((share - 0.4).abs() < 0.03, "rank 0 share {share}");
    }

    #[test]
    fn test_tournament_respects_comparator() {
        let pop = ranked(5);
        // Reverse the meaning of "fitter": the last rank now wins.
        let optimize = Optimize::minimize();
        let mut state = SelectionState::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = [0usize; 5];
        for _ in 0..5000 {
            c[Selection::Tournament2.select(&pop, &optimize, &mut state, &mut rng)] += 1;
        }
        assert!(c[4] > c[0], "got {c:?}");
    }

    #[test]
    fn test_custom_selection_is_clamped() {
        let sel = Selection::custom(|_pop: &[Phenotype<usize>], _rng| 99);
        assert_eq!(sequence(&sel, 3, 1), vec![2]);
    }

    #[test]
    fn test_single_individual() {
        for sel in [
            Selection::Fittest,
            Selection::FittestLinear,
            Selection::FittestRandom,
            Selection::Random,
            Selection::Sequential,
            Selection::RandomLinearRank,
            Selection::TrueLinearRank,
            Selection::Tournament2,
            Selection::Tournament3,
        ] {
            assert!(sequence(&sel, 1, 4).iter().all(|&i| i == 0), "{sel:?}");
        }
    }

    #[test]
    fn test_reset_rewinds_counters() {
        let pop = ranked(4);
        let optimize = Optimize::maximize();
        let mut state = SelectionState::default();
        let mut rng = StdRng::seed_from_u64(1);
        Selection::FittestLinear.select(&pop, &optimize, &mut state, &mut rng);
        Selection::FittestLinear.select(&pop, &optimize, &mut state, &mut rng);
        state.reset();
        assert_eq!(
            Selection::FittestLinear.select(&pop, &optimize, &mut state, &mut rng),
            0
        );
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<Phenotype<usize>> = vec![];
        let mut rng = StdRng::seed_from_u64(42);
        Selection::Random.select(
            &pop,
            &Optimize::maximize(),
            &mut SelectionState::default(),
            &mut rng,
        );
    }
}
