//! Seed material and the weak fallback derivation.
//!
//! A seed is exactly one hash block. It normally comes from an
//! [`EntropySource`](crate::source::EntropySource); when none is available
//! a weak seed is mixed from the wall clock and the process id.

mod clock;
mod weak;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use weak::derive_weak_seed;

use crate::expansion::BLOCK_LEN;

/// Seed length in bytes: one block of the hash primitive.
pub const SEED_LEN: usize = BLOCK_LEN;

/// One block of seed material.
///
/// The contents are never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Wraps raw bytes as a seed.
    pub const fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// An all-zero seed.
    pub const fn zeroed() -> Self {
        Self([0u8; SEED_LEN])
    }

    /// Returns the raw seed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    #[inline]
    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; SEED_LEN] {
        &mut self.0
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<[u8; SEED_LEN]> for Seed {
    fn from(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for Seed {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed")
            .field("len", &SEED_LEN)
            .finish_non_exhaustive()
    }
}
