//! Random source for the implicit-random delay distribution, injectable
//! so escalation scenarios are reproducible under test.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness for [`exprand`]. Implementations must be
/// `Send + Sync` since a `Sentry` may be constructed per request in a
/// multi-threaded server.
pub trait DelayRng: Send + Sync {
    /// A uniform sample in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// Uses the thread-local RNG; the production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRng;

impl DelayRng for ThreadRng {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// A seeded, reproducible RNG for tests that exercise the implicit-random
/// schedule deterministically.
pub struct SeededRng {
    inner: std::sync::Mutex<StdRng>,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: std::sync::Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl DelayRng for SeededRng {
    fn next_unit(&self) -> f64 {
        self.inner.lock().unwrap().gen::<f64>()
    }
}

/// Log-uniform sample in `[a, b]` minutes: `exp(u * (ln b - ln a) + ln a)`
/// where `u` is drawn from `rng`.
pub fn exprand(rng: &dyn DelayRng, a: u32, b: u32) -> u32 {
    let (a, b) = (a as f64, b as f64);
    let u = rng.next_unit();
    let sample = (u * (b.ln() - a.ln()) + a.ln()).exp();
    sample.round().clamp(a, b) as u32
}
