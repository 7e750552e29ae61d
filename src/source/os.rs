//! Operating system RNG as a seed source.

use super::{EntropyError, EntropySource};
use crate::seed::SEED_LEN;
use rand_core::{OsRng, RngCore};

/// Seeds from the OS random number generator (`getrandom` and friends).
///
/// Useful on platforms without a readable random device node.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSource;

impl EntropySource for OsSource {
    fn fill_seed(&mut self, seed: &mut [u8; SEED_LEN]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(seed)
            .map_err(|e| EntropyError::Os(e.to_string()))
    }

    fn name(&self) -> &str {
        "os"
    }
}
