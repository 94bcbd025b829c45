//! Random number generation.
//!
//! A single [`SimulationRng`] is seeded once at the
//! start of a simulation and passed by `&mut` to
//! every operation that needs randomness: node
//! identities, recombination breakpoints and the
//! choice of exchanged region all come from the
//! same stream.

use rand::rngs::StdRng;
use rand::Rng;
use rand::RngCore;
use rand::SeedableRng;

/// The shared random number generator.
///
/// This is a newtype wrapper around
/// [`rand::rngs::StdRng`]. It implements
/// [`RngCore`], so any `rand` distribution
/// can sample from it.
#[derive(Debug, Clone)]
pub struct SimulationRng(StdRng);

impl SimulationRng {
    /// Create a new [`SimulationRng`] with a seed.
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// A new node identity.
    pub fn next_id(&mut self) -> i64 {
        self.0.gen()
    }

    /// A uniform deviate on `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.0.gen()
    }
}

impl RngCore for SimulationRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}
