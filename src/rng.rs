//! Deterministic RNG based on splitmix64. Each trial draws from its own stream.

const SALT_TRIAL: u64 = 0x7065_7263_0000_0001;

#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Seed for trial `t` of an experiment, independent of scheduling order.
#[inline]
pub fn trial_seed(seed: u64, t: usize) -> u64 {
    splitmix64(seed ^ SALT_TRIAL ^ splitmix64(t as u64))
}

pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = splitmix64(self.state);
        self.state
    }

    /// Uniform in `0..max` by multiply-shift.
    pub fn range_usize(&mut self, max: usize) -> usize {
        ((self.next_u64() as u128 * max as u128) >> 64) as usize
    }

    /// Fisher-Yates.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range_usize(i + 1);
            items.swap(i, j);
        }
    }
}
