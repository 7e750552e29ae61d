//! Randstream Library
//!
//! A pseudorandom byte stream for internal identifiers: session ids, run
//! ids, temporary names. Output is unique and well distributed but is NOT
//! suitable for key material or for anything an adversary must not predict.
//!
//! # Architecture
//!
//! ```text
//! source → seed → expansion → generator
//!            ↑
//!      clock + pid (weak fallback)
//! ```
//!
//! - **source**: reads one 64-byte seed block from `/dev/urandom` or the OS RNG
//! - **seed**: the seed block and the weak time-based fallback
//! - **expansion**: HMAC-SHA256 of the seed over a 64-bit counter, one
//!   32-byte block per counter value
//! - **generator**: owns seed and counter, seeds lazily, never fails
//!
//! # Design Principles
//!
//! - **Always live**: a missing entropy device degrades seed quality, it
//!   never makes `fill` fail
//! - **Reproducible expansion**: output is a pure function of seed and counter
//! - **No shared state**: one generator per thread instead of a locked global
//!
//! # Example
//!
//! ```
//! // Per-thread generator, seeded on first use.
//! let mut id = [0u8; 16];
//! randstream::fill(&mut id);
//!
//! // Explicit generator with a known seed.
//! use randstream::{Seed, StreamGenerator};
//!
//! let mut generator = StreamGenerator::with_seed(Seed::zeroed(), 0);
//! let mut block = [0u8; 40];
//! generator.fill(&mut block);
//! assert_eq!(generator.counter(), 2);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod expansion;
pub mod generator;
pub mod metrics;
pub mod seed;
pub mod source;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FileConfig, GeneratorConfig, OutputConfig};
pub use generator::{fill, with_generator, GeneratorStats, StreamGenerator};
pub use seed::{Clock, ManualClock, Seed, SystemClock, SEED_LEN};
pub use source::{
    DeviceSource, EntropyError, EntropySource, FixedSource, OsSource, UnavailableSource,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
