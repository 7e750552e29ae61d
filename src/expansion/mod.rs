//! Counter-mode expansion of a seed into an output stream.
//!
//! Each output block is a keyed hash of the seed over a 64-bit counter.
//! Expansion is a pure function of the seed and the counter sequence; the
//! generator owns both and decides when the seed changes.

mod keyed;

pub use keyed::{keyed_block, BLOCK_LEN, DIGEST_LEN, INNER_PAD, OUTER_PAD};

use crate::seed::Seed;

/// Fills `out` from consecutive counter values starting at `*counter`.
///
/// The counter advances once per digest produced, including a final digest
/// that is only partly copied. Returns the number of blocks produced.
pub fn expand(seed: &Seed, counter: &mut u64, out: &mut [u8]) -> u64 {
    let mut blocks = 0u64;
    for chunk in out.chunks_mut(DIGEST_LEN) {
        let digest = keyed_block(seed, *counter);
        *counter = counter.wrapping_add(1);
        blocks += 1;
        chunk.copy_from_slice(&digest[..chunk.len()]);
    }
    blocks
}

/// Number of blocks needed to produce `len` bytes.
pub fn blocks_for(len: usize) -> u64 {
    len.div_ceil(DIGEST_LEN) as u64
}
