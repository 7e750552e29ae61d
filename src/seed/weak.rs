//! Weak seed derivation from time and process id.
//!
//! Used only when no entropy source could deliver a full block. The result
//! is predictable to anyone who knows roughly when the process ran; it only
//! serves to keep concurrently started processes from emitting the same
//! stream.

use super::{Clock, Seed, SEED_LEN};

/// Derives a weak seed.
///
/// Each byte takes its own clock reading, so a slow clock still spreads
/// microsecond jitter across the block.
pub fn derive_weak_seed<C: Clock + ?Sized>(clock: &C, pid: u32, discriminator: u64) -> Seed {
    let mut bytes = [0u8; SEED_LEN];
    for byte in bytes.iter_mut() {
        let ts = clock.now();
        let mixed = (ts.secs as u64) ^ u64::from(ts.micros) ^ u64::from(pid) ^ discriminator;
        *byte = mixed as u8;
    }
    Seed::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::ManualClock;

    #[test]
    fn test_each_byte_reads_clock() {
        let clock = ManualClock::new(0, 0);
        let seed = derive_weak_seed(&clock, 0, 0);

        // Successive microsecond readings 0..64 land in successive bytes.
        let expected: Vec<u8> = (0..SEED_LEN as u8).collect();
        assert_eq!(&seed.as_bytes()[..], &expected[..]);
    }

    #[test]
    fn test_pid_and_discriminator_mixed() {
        let a = derive_weak_seed(&ManualClock::new(1_700_000_000, 5), 100, 0);
        let b = derive_weak_seed(&ManualClock::new(1_700_000_000, 5), 101, 0);
        let c = derive_weak_seed(&ManualClock::new(1_700_000_000, 5), 100, 7);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_different_time_different_seed() {
        let a = derive_weak_seed(&ManualClock::new(1_700_000_000, 5), 42, 0);
        let b = derive_weak_seed(&ManualClock::new(1_700_000_000, 500), 42, 0);
        assert_ne!(a, b);
    }
}
