//! Entropy device reader.

use super::{EntropyError, EntropySource};
use crate::seed::SEED_LEN;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Default random device on Unix-like systems.
pub const DEFAULT_DEVICE: &str = "/dev/urandom";

/// Reads seed blocks from a character device or file.
///
/// The device is opened afresh for each attempt and closed when the
/// attempt ends, successful or not.
#[derive(Debug, Clone)]
pub struct DeviceSource {
    path: PathBuf,
}

impl DeviceSource {
    /// Creates a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the device path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DeviceSource {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }
}

impl EntropySource for DeviceSource {
    fn fill_seed(&mut self, seed: &mut [u8; SEED_LEN]) -> Result<(), EntropyError> {
        let mut file = File::open(&self.path).map_err(|source| EntropyError::Unavailable {
            path: self.path.clone(),
            source,
        })?;

        let mut got = 0;
        while got < SEED_LEN {
            match file.read(&mut seed[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!(
                        path = %self.path.display(),
                        got,
                        error = %e,
                        "Entropy device read failed"
                    );
                    break;
                }
            }
        }

        if got < SEED_LEN {
            return Err(EntropyError::ShortRead {
                got,
                need: SEED_LEN,
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "device"
    }
}
