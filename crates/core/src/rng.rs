//! RNG module - small deterministic generator
//!
//! Bots draw their randomness from here so a whole game can be replayed from a seed.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // 0 would be a fixed point of the low bits.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock, for games that need not be reproducible.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(1);
        Self::new(nanos)
    }

    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform-ish value in `[0, bound)`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        // High bits of an LCG are the better-distributed ones.
        ((self.next_u32() >> 8) as usize) % bound
    }

    /// Random element of `items`, `None` when empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.below(items.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        let first = rng.next_u32();
        assert_ne!(first, rng.next_u32());
    }

    #[test]
    fn time_seeded_generator_advances() {
        let mut rng = SimpleRng::from_time();
        let first = rng.next_u32();
        assert_ne!(first, rng.next_u32());
    }

    #[test]
    fn below_stays_in_range_and_covers_it() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [false; 16];
        for _ in 0..1000 {
            let v = rng.below(16);
            assert!(v < 16);
            seen[v] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn pick_handles_empty_slices() {
        let mut rng = SimpleRng::new(3);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert_eq!(rng.pick(&[9]), Some(&9));
    }
}
