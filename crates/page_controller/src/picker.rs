//! Sources of uniform random choices for the quote and image operations.

use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait Picker: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Draws from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl Picker for ThreadRngPicker {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Reproducible choices from a fixed seed.
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Picker for SeededPicker {
    fn pick_index(&self, len: usize) -> usize {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..len.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_sequence() {
        let a = SeededPicker::new(7);
        let b = SeededPicker::new(7);
        let left: Vec<usize> = (0..32).map(|_| a.pick_index(3)).collect();
        let right: Vec<usize> = (0..32).map(|_| b.pick_index(3)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn picks_stay_in_range() {
        let picker = ThreadRngPicker;
        assert!((0..1000).all(|_| picker.pick_index(2) < 2));
    }
}
