//! crates/quiz_core/src/shuffle.rs
//!
//! `Shuffler` implementations. Production uses the thread RNG with no stored
//! seed; tests use a seeded `StdRng` so option orders are reproducible.

use crate::ports::Shuffler;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

/// Unseeded shuffler backed by `rand::rng()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn permutation(&self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(&mut rand::rng());
        indices
    }
}

/// Deterministic shuffler for tests.
#[derive(Debug)]
pub struct SeededShuffler {
    rng: Mutex<StdRng>,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn permutation(&self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        indices.shuffle(&mut *rng);
        indices
    }
}

/// Reorders `items` by a fresh permutation and returns them.
pub fn shuffled<T>(shuffler: &dyn Shuffler, items: Vec<T>) -> Vec<T> {
    let order = shuffler.permutation(items.len());
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_contains_every_index_once() {
        let shuffler = ThreadRngShuffler;
        for len in 0..12 {
            let mut perm = shuffler.permutation(len);
            perm.sort_unstable();
            assert_eq!(perm, (0..len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn seeded_shuffler_is_reproducible() {
        let a = SeededShuffler::new(7);
        let b = SeededShuffler::new(7);
        for _ in 0..5 {
            assert_eq!(a.permutation(10), b.permutation(10));
        }
    }

    #[test]
    fn shuffled_keeps_all_items() {
        let shuffler = SeededShuffler::new(3);
        let mut out = shuffled(&shuffler, vec!["a", "b", "c", "d"]);
        out.sort_unstable();
        assert_eq!(out, vec!["a", "b", "c", "d"]);
    }
}
