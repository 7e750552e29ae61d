//! Prometheus metrics for generator activity.
//!
//! # Metrics Exposed
//!
//! - `randstream_seeded` - Strong seed obtained (1) or degraded mode (0)
//! - `randstream_counter` - Next counter value to be hashed
//! - `randstream_bytes_generated_total` - Bytes written to callers
//! - `randstream_blocks_total` - Digest blocks produced
//! - `randstream_weak_reseeds_total` - Weak seeds derived
//!
//! With the `metrics` feature, [`MetricsServer`] serves these on `/metrics`
//! and reports [`SeedHealth`] on `/health`.
//!
//! # Example
//!
//! ```
//! use randstream::metrics::{MetricsRegistry, SeedHealth};
//! use randstream::{Seed, StreamGenerator};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! let mut generator = StreamGenerator::with_seed(Seed::zeroed(), 0);
//!
//! let mut id = [0u8; 16];
//! generator.fill(&mut id);
//! registry.update(&generator.stats());
//! assert_eq!(registry.health(), SeedHealth::Seeded);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, SeedHealth};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, ServerError};
