//! The byte stream generator.
//!
//! # Seeding Model
//!
//! The first call to [`StreamGenerator::fill`] asks the entropy source for
//! one seed block. On success the seed is fixed for the life of the
//! generator and the stream is fully determined by it.
//!
//! If the source fails, a weak seed is mixed from the clock, the process id
//! and the failure itself. The generator stays unseeded, so the next call
//! asks the source again and, if it still fails, derives a fresh weak seed.
//! The weak seed is never cached: re-deriving it on every call keeps two
//! processes started in the same clock tick from tracking each other.
//!
//! Either way, `fill` always succeeds.

use crate::config::GeneratorConfig;
use crate::expansion::{expand, DIGEST_LEN};
use crate::seed::{derive_weak_seed, Clock, Seed, SystemClock};
use crate::source::{DeviceSource, EntropySource, UnavailableSource};
use rand_core::{impls, RngCore, SeedableRng};

/// Counters describing a generator's activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    /// Whether a strong seed has been obtained.
    pub seeded: bool,
    /// Next counter value to be hashed.
    pub counter: u64,
    /// Total bytes written to callers.
    pub bytes_generated: u64,
    /// Total blocks hashed, including partly used ones.
    pub blocks_produced: u64,
    /// Number of times a weak seed was derived.
    pub weak_reseeds: u64,
}

/// Pseudorandom byte generator for identifiers.
///
/// NOT suitable for key material: the output is only as unpredictable as
/// the seed, and the fallback seed is guessable.
pub struct StreamGenerator<S = DeviceSource, C = SystemClock> {
    source: S,
    clock: C,
    seed: Seed,
    counter: u64,
    seeded: bool,
    /// Set once the degraded-mode warning has been logged.
    degraded: bool,
    pid: u32,
    bytes_generated: u64,
    blocks_produced: u64,
    weak_reseeds: u64,
}

impl<S: EntropySource, C: Clock> StreamGenerator<S, C> {
    /// Creates an unseeded generator.
    ///
    /// Nothing is read from `source` until the first call to `fill`.
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            seed: Seed::zeroed(),
            counter: 0,
            seeded: false,
            degraded: false,
            pid: std::process::id(),
            bytes_generated: 0,
            blocks_produced: 0,
            weak_reseeds: 0,
        }
    }

    /// Overrides the process id mixed into weak seeds.
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Overwrites `buf` entirely with generated bytes.
    ///
    /// Never fails. An empty buffer still triggers lazy seeding but hashes
    /// no blocks. Each call starts at a fresh block; the unused tail of the
    /// previous call's last digest is discarded.
    pub fn fill(&mut self, buf: &mut [u8]) {
        self.ensure_seeded();

        let blocks = expand(&self.seed, &mut self.counter, buf);
        self.blocks_produced += blocks;
        self.bytes_generated += buf.len() as u64;

        tracing::trace!(
            len = buf.len(),
            blocks,
            counter = self.counter,
            "Generated bytes"
        );
    }

    fn ensure_seeded(&mut self) {
        if self.seeded {
            return;
        }

        match self.source.fill_seed(self.seed.as_mut_bytes()) {
            Ok(()) => {
                self.seeded = true;
                if self.degraded {
                    tracing::info!(
                        source = self.source.name(),
                        weak_reseeds = self.weak_reseeds,
                        "Entropy source recovered, leaving degraded mode"
                    );
                } else {
                    tracing::debug!(source = self.source.name(), "Generator seeded");
                }
            }
            Err(err) => {
                self.seed = derive_weak_seed(&self.clock, self.pid, err.discriminator());
                self.weak_reseeds += 1;

                if !self.degraded {
                    self.degraded = true;
                    tracing::warn!(
                        source = self.source.name(),
                        error = %err,
                        "Entropy source unavailable, using weak time-based seed"
                    );
                } else {
                    tracing::debug!(
                        weak_reseeds = self.weak_reseeds,
                        "Re-derived weak seed"
                    );
                }
            }
        }
    }

    /// Returns true once a strong seed has been obtained.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Returns the next counter value.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Returns total bytes generated.
    pub fn bytes_generated(&self) -> u64 {
        self.bytes_generated
    }

    /// Returns how many weak seeds have been derived.
    pub fn weak_reseeds(&self) -> u64 {
        self.weak_reseeds
    }

    /// Returns a snapshot of the generator's counters.
    pub fn stats(&self) -> GeneratorStats {
        GeneratorStats {
            seeded: self.seeded,
            counter: self.counter,
            bytes_generated: self.bytes_generated,
            blocks_produced: self.blocks_produced,
            weak_reseeds: self.weak_reseeds,
        }
    }

    /// Returns the entropy source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl StreamGenerator<UnavailableSource, SystemClock> {
    /// Creates a generator that is already seeded, starting at `counter`.
    ///
    /// The stream is fully determined by `(seed, counter)`.
    pub fn with_seed(seed: Seed, counter: u64) -> Self {
        Self {
            seed,
            counter,
            seeded: true,
            ..Self::new(UnavailableSource::new(), SystemClock)
        }
    }
}

impl StreamGenerator<DeviceSource, SystemClock> {
    /// Creates a generator reading its seed from the device at `path`.
    pub fn from_device(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(DeviceSource::new(path), SystemClock)
    }

    /// Creates a generator from configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::from_device(config.entropy_device.clone())
    }
}

impl Default for StreamGenerator<DeviceSource, SystemClock> {
    fn default() -> Self {
        Self::new(DeviceSource::default(), SystemClock)
    }
}

impl<S, C> std::fmt::Debug for StreamGenerator<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamGenerator")
            .field("seeded", &self.seeded)
            .field("counter", &self.counter)
            .field("bytes_generated", &self.bytes_generated)
            .field("weak_reseeds", &self.weak_reseeds)
            .finish_non_exhaustive()
    }
}

impl<S: EntropySource, C: Clock> RngCore for StreamGenerator<S, C> {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill(dest);
        Ok(())
    }
}

impl SeedableRng for StreamGenerator<UnavailableSource, SystemClock> {
    type Seed = Seed;

    fn from_seed(seed: Self::Seed) -> Self {
        Self::with_seed(seed, 0)
    }
}

/// Bytes produced per counter value.
pub const BLOCK_OUTPUT: usize = DIGEST_LEN;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::{blocks_for, keyed_block};
    use crate::seed::{ManualClock, SEED_LEN};
    use crate::source::{EntropyError, FixedSource};
    use proptest::prelude::*;
    use std::collections::HashSet;

    const GOLDEN_0: [u8; 32] = [
        0xf3, 0x75, 0x18, 0x0a, 0xba, 0x92, 0x88, 0x84, 0x01, 0xf1, 0x91, 0x9b, 0xe4, 0xa8, 0x71,
        0x5a, 0x62, 0x76, 0x3b, 0x65, 0xc1, 0xc1, 0x0e, 0x1d, 0x08, 0x58, 0xe8, 0x1d, 0x4d, 0x6f,
        0x9f, 0xd2,
    ];
    const GOLDEN_1_PREFIX: [u8; 8] = [0x45, 0x64, 0x29, 0x32, 0x87, 0x05, 0x25, 0x26];

    fn seeded(byte: u8) -> StreamGenerator<UnavailableSource, SystemClock> {
        StreamGenerator::with_seed(Seed::from_bytes([byte; SEED_LEN]), 0)
    }

    /// Fails with a short read a fixed number of times, then delivers `block`.
    struct FlakySource {
        failures_left: u32,
        block: [u8; SEED_LEN],
    }

    impl EntropySource for FlakySource {
        fn fill_seed(&mut self, seed: &mut [u8; SEED_LEN]) -> Result<(), EntropyError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(EntropyError::ShortRead {
                    got: 3,
                    need: SEED_LEN,
                });
            }
            seed.copy_from_slice(&self.block);
            Ok(())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn degraded(clock: ManualClock, pid: u32) -> StreamGenerator<UnavailableSource, ManualClock> {
        StreamGenerator::new(UnavailableSource::new(), clock).with_pid(pid)
    }

    fn stream(seed_byte: u8, counter: u64, len: usize) -> Vec<u8> {
        let mut gen =
            StreamGenerator::with_seed(Seed::from_bytes([seed_byte; SEED_LEN]), counter);
        let mut out = vec![0u8; len];
        gen.fill(&mut out);
        out
    }

    #[test]
    fn test_golden_vector_first_block() {
        let mut gen = seeded(0);
        let mut out = [0u8; 32];
        gen.fill(&mut out);
        assert_eq!(out, GOLDEN_0);
        assert_eq!(gen.counter(), 1);
    }

    #[test]
    fn test_golden_vector_forty_bytes() {
        let mut gen = seeded(0);
        let mut out = [0u8; 40];
        gen.fill(&mut out);
        assert_eq!(&out[..32], &GOLDEN_0[..]);
        assert_eq!(&out[32..], &GOLDEN_1_PREFIX[..]);
        assert_eq!(gen.counter(), 2);
    }

    #[test]
    fn test_deterministic_for_fixed_state() {
        assert_eq!(stream(7, 100, 500), stream(7, 100, 500));
        assert_ne!(stream(7, 100, 64), stream(7, 101, 64));
    }

    #[test]
    fn test_truncated_call_starts_fresh_block() {
        let mut gen = seeded(3);
        let mut first = [0u8; 10];
        let mut second = [0u8; 32];
        gen.fill(&mut first);
        gen.fill(&mut second);

        let seed = Seed::from_bytes([3; SEED_LEN]);
        assert_eq!(&first[..], &keyed_block(&seed, 0)[..10]);
        assert_eq!(second, keyed_block(&seed, 1));
    }

    #[test]
    fn test_zero_length_fill() {
        let mut gen = StreamGenerator::new(FixedSource::new([1; SEED_LEN]), ManualClock::new(0, 0));
        gen.fill(&mut [0u8; 0]);
        assert!(gen.is_seeded());
        assert_eq!(gen.counter(), 0);
        assert_eq!(gen.bytes_generated(), 0);
        assert_eq!(gen.source().calls(), 1);
    }

    #[test]
    fn test_strong_seed_read_once() {
        let mut gen = StreamGenerator::new(FixedSource::new([1; SEED_LEN]), ManualClock::new(0, 0));
        let mut buf = [0u8; 16];
        for _ in 0..5 {
            gen.fill(&mut buf);
        }
        assert_eq!(gen.source().calls(), 1);
        assert_eq!(gen.weak_reseeds(), 0);
        assert_eq!(gen.counter(), 5);
    }

    #[test]
    fn test_fixed_source_matches_with_seed() {
        let mut from_source =
            StreamGenerator::new(FixedSource::new([0; SEED_LEN]), ManualClock::new(0, 0));
        let mut out = [0u8; 32];
        from_source.fill(&mut out);
        assert_eq!(out, GOLDEN_0);
    }

    #[test]
    fn test_seed_independence() {
        let mut a = StreamGenerator::with_seed(Seed::from_bytes([0x11; SEED_LEN]), 0);
        let mut b = StreamGenerator::with_seed(Seed::from_bytes([0x22; SEED_LEN]), 0);

        let mut seen = HashSet::new();
        let mut buf = [0u8; 16];
        for _ in 0..1000 {
            a.fill(&mut buf);
            assert!(seen.insert(buf));
            b.fill(&mut buf);
            assert!(seen.insert(buf));
        }
        assert_eq!(seen.len(), 2000);
    }

    #[test]
    fn test_degraded_mode_always_fills() {
        let clock = ManualClock::new(1_700_000_000, 0);
        let mut gen = StreamGenerator::new(UnavailableSource::new(), &clock).with_pid(4242);

        for len in [0usize, 1, 31, 32, 33, 100] {
            let mut buf = vec![0u8; len];
            gen.fill(&mut buf);
            assert_eq!(buf.len(), len);
        }
        assert!(!gen.is_seeded());
        assert_eq!(gen.weak_reseeds(), 6);
        assert_eq!(gen.source().attempts(), 6);
    }

    #[test]
    fn test_degraded_output_tracks_clock() {
        let clock = ManualClock::new(1_700_000_000, 0);
        let mut gen = StreamGenerator::new(UnavailableSource::new(), &clock).with_pid(1);

        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        gen.fill(&mut first);
        clock.set(1_700_000_000, 0);
        // Same clock reading but a later counter still changes the output.
        gen.fill(&mut second);
        assert_ne!(first, second);

        let mut third = [0u8; 16];
        let mut fourth = [0u8; 16];
        let mut a = degraded(ManualClock::new(5, 0), 1);
        let mut b = degraded(ManualClock::new(5, 100), 1);
        a.fill(&mut third);
        b.fill(&mut fourth);
        assert_ne!(third, fourth);
    }

    #[test]
    fn test_degraded_same_clock_same_output() {
        let mut a = degraded(ManualClock::new(5, 0), 9);
        let mut b = degraded(ManualClock::new(5, 0), 9);
        let mut x = [0u8; 48];
        let mut y = [0u8; 48];
        a.fill(&mut x);
        b.fill(&mut y);
        assert_eq!(x, y);
    }

    #[test]
    fn test_source_recovery_leaves_degraded_mode() {
        let block = [0x5A; SEED_LEN];
        let source = FlakySource {
            failures_left: 2,
            block,
        };
        let mut gen = StreamGenerator::new(source, ManualClock::new(1_700_000_000, 0)).with_pid(7);

        let mut buf = [0u8; 32];
        gen.fill(&mut buf);
        gen.fill(&mut buf);
        assert!(!gen.is_seeded());
        assert_eq!(gen.weak_reseeds(), 2);
        assert_eq!(gen.counter(), 2);

        // Third attempt succeeds: strong seed, counter carries on from 2.
        gen.fill(&mut buf);
        assert!(gen.is_seeded());
        assert_eq!(gen.weak_reseeds(), 2);
        assert_eq!(gen.counter(), 3);
        assert_eq!(buf, keyed_block(&Seed::from_bytes(block), 2));

        // Seeded for good: no further weak seeds, stream stays on the strong seed.
        gen.fill(&mut buf);
        assert_eq!(gen.weak_reseeds(), 2);
        assert_eq!(buf, keyed_block(&Seed::from_bytes(block), 3));
        assert_eq!(gen.stats().blocks_produced, 4);
    }

    #[test]
    fn test_rng_core_and_seedable() {
        let mut gen: StreamGenerator<UnavailableSource, SystemClock> =
            SeedableRng::from_seed(Seed::zeroed());
        let word = gen.next_u64();
        assert_eq!(word, u64::from_le_bytes(GOLDEN_0[..8].try_into().unwrap()));

        let mut buf = [0u8; 8];
        gen.try_fill_bytes(&mut buf).unwrap();
        assert_eq!(buf, GOLDEN_1_PREFIX);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut gen = seeded(0);
        let mut buf = [0u8; 40];
        gen.fill(&mut buf);
        gen.fill(&mut buf[..5]);

        assert_eq!(
            gen.stats(),
            GeneratorStats {
                seeded: true,
                counter: 3,
                bytes_generated: 45,
                blocks_produced: 3,
                weak_reseeds: 0,
            }
        );
    }

    proptest! {
        #[test]
        fn prop_whole_block_calls_concatenate(
            seed_byte in any::<u8>(),
            start in any::<u64>(),
            l1_blocks in 0usize..8,
            l2 in 0usize..300,
        ) {
            let l1 = l1_blocks * BLOCK_OUTPUT;
            let mut gen =
                StreamGenerator::with_seed(Seed::from_bytes([seed_byte; SEED_LEN]), start);
            let mut split = vec![0u8; l1 + l2];
            let (head, tail) = split.split_at_mut(l1);
            gen.fill(head);
            gen.fill(tail);

            prop_assert_eq!(split, stream(seed_byte, start, l1 + l2));
        }

        #[test]
        fn prop_exact_length_and_fresh_block(
            seed_byte in any::<u8>(),
            l1 in 0usize..200,
            l2 in 1usize..200,
        ) {
            let mut gen = StreamGenerator::with_seed(Seed::from_bytes([seed_byte; SEED_LEN]), 0);
            let mut a = vec![0u8; l1];
            let mut b = vec![0u8; l2];
            gen.fill(&mut a);
            let resume_at = gen.counter();
            gen.fill(&mut b);

            prop_assert_eq!(resume_at, blocks_for(l1));
            prop_assert_eq!(&a, &stream(seed_byte, 0, l1));
            prop_assert_eq!(&b, &stream(seed_byte, resume_at, l2));
        }
    }
}
