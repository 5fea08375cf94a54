//! Deterministic seeded shuffling.
//!
//! A session seed drives an xorshift32 generator, which in turn drives a single
//! Fisher–Yates pass. The same seed always yields the same permutation.

/// Substituted for a zero seed; zero is a fixed point of xorshift.
pub const FALLBACK_SEED: u32 = 0x9E37_79B9;

/// Marsaglia xorshift32 generator.
///
/// State and output are unsigned 32-bit values, so no sign normalization is
/// ever needed before taking a modulo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { FALLBACK_SEED } else { seed };
        Self { state }
    }

    /// Advances the generator and returns the new state.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a value in `0..bound`. `bound` must be non-zero.
    fn next_below(&mut self, bound: usize) -> usize {
        let value = usize::try_from(self.next_u32()).unwrap_or(usize::MAX);
        value % bound
    }
}

/// Shuffles `items` in place, deterministically for a given `seed`.
pub fn seeded_shuffle<T>(items: &mut [T], seed: u32) {
    if items.len() < 2 {
        return;
    }

    let mut rng = Xorshift32::new(seed);
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i + 1);
        items.swap(i, j);
    }
}

/// Returns a shuffled copy of `items`.
#[must_use]
pub fn shuffled<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut out = items.to_vec();
    seeded_shuffle(&mut out, seed);
    out
}

/// Returns the permutation `0..len` for `seed`.
#[must_use]
pub fn permutation(len: usize, seed: u32) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    seeded_shuffle(&mut order, seed);
    order
}

/// Shuffles a copy of `items` and reports where `items[0]` landed.
///
/// The first entry is the correct answer everywhere this is used.
#[must_use]
pub fn arrange<T: Clone>(items: &[T], seed: u32) -> (Vec<T>, usize) {
    let order = permutation(items.len(), seed);
    let first_at = order.iter().position(|&source| source == 0).unwrap_or(0);
    let arranged = order.into_iter().map(|source| items[source].clone()).collect();
    (arranged, first_at)
}
