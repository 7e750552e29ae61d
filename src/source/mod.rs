//! Entropy sources for seeding.
//!
//! A source is asked for exactly one seed block. Failure is reported to the
//! generator, which absorbs it into degraded mode; it never reaches callers
//! of [`fill`](crate::fill).

mod device;
mod mock;
mod os;

pub use device::{DeviceSource, DEFAULT_DEVICE};
pub use mock::{FixedSource, UnavailableSource};
pub use os::OsSource;

use crate::seed::SEED_LEN;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while acquiring seed material.
#[derive(Debug, Error)]
pub enum EntropyError {
    /// The device could not be opened.
    #[error("entropy device {} unavailable: {source}", path.display())]
    Unavailable {
        /// Device path that was tried.
        path: PathBuf,
        /// Underlying open error.
        #[source]
        source: std::io::Error,
    },
    /// The source ended before a full block was read.
    #[error("short read from entropy source: got {got} bytes, need {need}")]
    ShortRead {
        /// Bytes obtained before the failure.
        got: usize,
        /// Bytes required.
        need: usize,
    },
    /// The OS random number generator reported an error.
    #[error("os entropy failure: {0}")]
    Os(String),
}

impl EntropyError {
    /// Value derived from the failed attempt, mixed into the weak seed so
    /// that different failure modes do not produce the same fallback.
    pub fn discriminator(&self) -> u64 {
        match self {
            EntropyError::Unavailable { source, .. } => {
                source.raw_os_error().map(|code| code as u64).unwrap_or(u64::MAX)
            }
            EntropyError::ShortRead { got, .. } => *got as u64,
            EntropyError::Os(msg) => msg.len() as u64,
        }
    }
}

/// Trait for seed providers.
///
/// Implementations fill the whole block or return an error; a partially
/// filled block must be reported as [`EntropyError::ShortRead`].
pub trait EntropySource {
    /// Fills `seed` with one block of entropy.
    fn fill_seed(&mut self, seed: &mut [u8; SEED_LEN]) -> Result<(), EntropyError>;

    /// Short human-readable name used in log events.
    fn name(&self) -> &str;
}

impl<S: EntropySource + ?Sized> EntropySource for Box<S> {
    fn fill_seed(&mut self, seed: &mut [u8; SEED_LEN]) -> Result<(), EntropyError> {
        (**self).fill_seed(seed)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
