use std::cell::RefCell;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Number of uniform samples summed by [`Random::normal`].
const NORMAL_SAMPLES: u32 = 6;

/// Seeded random source shared by everything that runs inside one world or one
/// generation call.
///
/// Reads go through `&self` so behaviors holding a shared borrow of the world
/// can still roll dice. The simulation is single-threaded, so the `RefCell`
/// is never contended.
#[derive(Debug)]
pub struct Random {
    rng: RefCell<ChaCha8Rng>,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Resolve a configured seed: 0 means "pick one".
    pub fn resolve_seed(seed: u64) -> u64 {
        if seed == 0 {
            rand::thread_rng().r#gen::<u64>().max(1)
        } else {
            seed
        }
    }

    /// Derive an independent seed, e.g. for a zone generated mid-game.
    pub fn next_seed(&self) -> u64 {
        self.rng.borrow_mut().r#gen::<u64>().max(1)
    }

    pub fn bytes(&self) -> [u8; 16] {
        self.rng.borrow_mut().r#gen()
    }

    /// Uniform integer in `[0, n)`. Returns 0 when `n <= 0`.
    pub fn below(&self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.borrow_mut().gen_range(0..n)
    }

    /// Uniform integer in `[min, max]`.
    pub fn range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.borrow_mut().gen_range(min..=max)
    }

    /// Uniform index into a collection of `len` elements.
    pub fn index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.borrow_mut().gen_range(0..len)
    }

    /// Uniform float in `[0, 1)`.
    pub fn float(&self) -> f64 {
        self.rng.borrow_mut().r#gen::<f64>()
    }

    /// True with `percent` in 100 odds.
    pub fn chance(&self, percent: i32) -> bool {
        self.below(100) < percent
    }

    /// Bell-shaped value in `[min, max]`: the mean of six uniforms, stretched
    /// onto the range (central limit approximation).
    pub fn normal(&self, min: f64, max: f64) -> f64 {
        let mut rng = self.rng.borrow_mut();
        let sum: f64 = (0..NORMAL_SAMPLES).map(|_| rng.r#gen::<f64>()).sum();
        min + (max - min) * (sum / NORMAL_SAMPLES as f64)
    }

    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut *self.rng.borrow_mut())
    }

    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.rng.borrow_mut());
    }
}
