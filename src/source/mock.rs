//! Deterministic sources for tests and demonstrations.

use super::{EntropyError, EntropySource};
use crate::seed::SEED_LEN;
use std::io;

/// Always yields the same block.
///
/// NOT for production use: every generator seeded from it produces the
/// same stream.
#[derive(Debug, Clone)]
pub struct FixedSource {
    block: [u8; SEED_LEN],
    calls: u64,
}

impl FixedSource {
    /// Creates a source yielding `block` on every request.
    pub fn new(block: [u8; SEED_LEN]) -> Self {
        Self { block, calls: 0 }
    }

    /// Number of times a seed was requested.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl EntropySource for FixedSource {
    fn fill_seed(&mut self, seed: &mut [u8; SEED_LEN]) -> Result<(), EntropyError> {
        self.calls += 1;
        seed.copy_from_slice(&self.block);
        Ok(())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// A source that never delivers, forcing degraded mode.
#[derive(Debug, Default, Clone)]
pub struct UnavailableSource {
    attempts: u64,
}

impl UnavailableSource {
    /// Creates a source that has seen no attempts yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of seeding attempts made against this source.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }
}

impl EntropySource for UnavailableSource {
    fn fill_seed(&mut self, _seed: &mut [u8; SEED_LEN]) -> Result<(), EntropyError> {
        self.attempts += 1;
        Err(EntropyError::Unavailable {
            path: "<unavailable>".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "entropy source disabled"),
        })
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
