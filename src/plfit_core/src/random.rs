//! # Random
//! Seedable source of uniform random numbers.
//!
//! Everything in this crate which consumes entropy is generic over [`rand::Rng`], so
//! any generator may be plugged in. [`RandomSource`] is the default generator, it
//! additionally knows how to derive independent and reproducible streams for the
//! bootstrap replicas.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable uniform random number generator.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Construct a new source.
    ///
    /// If no seed is provided, one is drawn from the thread local entropy source.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        RandomSource {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Re-seed this source, restarting its sequence.
    pub fn reseed(&mut self, seed: Option<u64>) {
        *self = RandomSource::new(seed);
    }

    /// The seed this source was constructed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform real value in `[0, 1)`.
    pub fn uniform01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[0, max_inclusive]`.
    pub fn uniform_int(&mut self, max_inclusive: usize) -> usize {
        self.rng.gen_range(0..=max_inclusive)
    }

    /// Independent random stream for the replica at the given index.
    ///
    /// Streams only depend on the seed and the index, so replicas draw the same
    /// numbers regardless of the order or thread they are executed on.
    pub fn replica_stream(&self, index: u64) -> RandomSource {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(index);
        RandomSource {
            seed: self.seed,
            rng,
        }
    }
}

impl RngCore for RandomSource {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_repeatable() {
        let mut a = RandomSource::new(Some(42));
        let mut b = RandomSource::new(Some(42));
        for _ in 0..100 {
            assert_eq!(a.uniform01(), b.uniform01());
        }
        a.reseed(Some(42));
        b.reseed(Some(42));
        assert_eq!(a.uniform_int(1000), b.uniform_int(1000));
    }

    #[test]
    fn test_ranges() {
        let mut rng = RandomSource::new(Some(7));
        for _ in 0..1000 {
            let u = rng.uniform01();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.uniform_int(3) <= 3);
        }
        assert_eq!(rng.uniform_int(0), 0);
    }

    #[test]
    fn test_replica_streams() {
        let source = RandomSource::new(Some(11));
        let mut first = source.replica_stream(0);
        let mut again = source.replica_stream(0);
        let mut second = source.replica_stream(1);

        let a: Vec<u64> = (0..8).map(|_| first.next_u64()).collect();
        let b: Vec<u64> = (0..8).map(|_| again.next_u64()).collect();
        let c: Vec<u64> = (0..8).map(|_| second.next_u64()).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
