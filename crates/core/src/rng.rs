//! RNG module - random sources for dealing
//!
//! The deck is shuffled through the [`RandomSource`] trait so tests can drive it
//! with a fixed sequence. [`SimpleRng`] is the default seedable source.

/// A source of uniformly distributed `u32` values.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, bound)`.
    ///
    /// Uses rejection sampling so small bounds carry no modulo bias.
    /// `bound` must be non-zero.
    fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        // Largest multiple of `bound` representable in u32 space.
        let zone = u32::MAX - (u32::MAX % bound);
        loop {
            let v = self.next_u32();
            if v < zone {
                return v % bound;
            }
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current state, reusable as a seed to replay the same sequence.
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG are weak; fold the high half down.
        self.state ^ (self.state >> 16)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Shuffle a slice in place using Fisher-Yates.
///
/// Walks from the last index down to 1, swapping each position with a uniformly
/// chosen index in `[0, i]`.
pub fn shuffle<T, R: RandomSource + ?Sized>(slice: &mut [T], rng: &mut R) {
    for i in (1..slice.len()).rev() {
        let j = rng.next_below((i + 1) as u32) as usize;
        slice.swap(i, j);
    }
}
