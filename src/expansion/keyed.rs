//! Keyed hash over the block counter.
//!
//! This is the two-pass HMAC construction with a key of exactly one block,
//! written out directly over SHA-256:
//!
//! ```text
//! H((seed ^ opad) || H((seed ^ ipad) || counter_le))
//! ```
//!
//! With a 64-byte key no key hashing or padding is needed, so the result
//! is byte-identical to HMAC-SHA256(seed, counter_le).

use crate::seed::Seed;
use sha2::{Digest, Sha256};

/// Block size of the hash primitive in bytes.
pub const BLOCK_LEN: usize = 64;
/// Digest size of the hash primitive in bytes.
pub const DIGEST_LEN: usize = 32;
/// Inner pad byte.
pub const INNER_PAD: u8 = 0x36;
/// Outer pad byte.
pub const OUTER_PAD: u8 = 0x5C;

/// Computes the output block for `counter`.
pub fn keyed_block(seed: &Seed, counter: u64) -> [u8; DIGEST_LEN] {
    let inner = {
        let mut hasher = Sha256::new();
        hasher.update(padded(seed, INNER_PAD));
        hasher.update(counter.to_le_bytes());
        hasher.finalize()
    };

    let mut hasher = Sha256::new();
    hasher.update(padded(seed, OUTER_PAD));
    hasher.update(inner);

    let mut block = [0u8; DIGEST_LEN];
    block.copy_from_slice(&hasher.finalize());
    block
}

#[inline]
fn padded(seed: &Seed, pad: u8) -> [u8; BLOCK_LEN] {
    let mut key = *seed.as_bytes();
    key.iter_mut().for_each(|b| *b ^= pad);
    key
}
