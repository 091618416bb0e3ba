//! Random number generator construction.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the engine RNG: seeded when `seed` is given, from the OS otherwise.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Derives the seed of the `index`-th child engine from a parent seed.
pub fn derive_seed(seed: Option<u64>, index: usize) -> Option<u64> {
    seed.map(|s| s.wrapping_add(0x9E37_79B9_7F4A_7C15u64.wrapping_mul(index as u64 + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut first = create_rng(Some(9));
        let mut second = create_rng(Some(9));
        let a: Vec<u32> = (0..5).map(|_| first.random()).collect();
        let b: Vec<u32> = (0..5).map(|_| second.random()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derived_seeds_differ() {
        assert_eq!(derive_seed(None, 3), None);
        assert_ne!(derive_seed(Some(1), 0), derive_seed(Some(1), 1));
    }
}
