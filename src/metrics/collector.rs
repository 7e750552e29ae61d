//! Metrics collection and registry.

use crate::generator::GeneratorStats;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Seed quality as seen through the exported metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedHealth {
    /// No bytes generated yet, so no seeding attempt has been recorded.
    Idle,
    /// Running on a strong seed from the entropy source.
    Seeded,
    /// Running on weak time-based seeds.
    Degraded {
        /// Weak seeds derived so far.
        weak_reseeds: u64,
    },
}

impl std::fmt::Display for SeedHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedHealth::Idle => write!(f, "idle"),
            SeedHealth::Seeded => write!(f, "seeded"),
            SeedHealth::Degraded { weak_reseeds } => {
                write!(f, "degraded: {} weak seeds derived", weak_reseeds)
            }
        }
    }
}

/// Prometheus metrics registry for generator monitoring.
pub struct MetricsRegistry {
    registry: Registry,
    seeded: IntGauge,
    counter: IntGauge,
    bytes_generated: IntCounter,
    blocks: IntCounter,
    weak_reseeds: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new registry with all generator metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let seeded = IntGauge::new(
            "randstream_seeded",
            "Strong seed obtained (1) or running on weak seeds (0)",
        )?;
        let counter = IntGauge::new("randstream_counter", "Next counter value to be hashed")?;
        let bytes_generated = IntCounter::new(
            "randstream_bytes_generated_total",
            "Total bytes written to callers",
        )?;
        let blocks = IntCounter::new("randstream_blocks_total", "Total digest blocks produced")?;
        let weak_reseeds = IntCounter::new(
            "randstream_weak_reseeds_total",
            "Total weak time-based seeds derived",
        )?;

        registry.register(Box::new(seeded.clone()))?;
        registry.register(Box::new(counter.clone()))?;
        registry.register(Box::new(bytes_generated.clone()))?;
        registry.register(Box::new(blocks.clone()))?;
        registry.register(Box::new(weak_reseeds.clone()))?;

        Ok(Self {
            registry,
            seeded,
            counter,
            bytes_generated,
            blocks,
            weak_reseeds,
        })
    }

    /// Updates all metrics from a generator's stats.
    pub fn update(&self, stats: &GeneratorStats) {
        self.seeded.set(i64::from(stats.seeded));
        // The counter may exceed i64 after wrapping; the gauge is informational.
        self.counter.set(stats.counter as i64);

        // Counters only move forward by the difference
        advance(&self.bytes_generated, stats.bytes_generated);
        advance(&self.blocks, stats.blocks_produced);
        advance(&self.weak_reseeds, stats.weak_reseeds);
    }

    /// Reports seed health from the recorded gauges.
    pub fn health(&self) -> SeedHealth {
        if self.seeded.get() == 1 {
            SeedHealth::Seeded
        } else if self.weak_reseeds.get() > 0 {
            SeedHealth::Degraded {
                weak_reseeds: self.weak_reseeds.get(),
            }
        } else {
            SeedHealth::Idle
        }
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(metric: &IntCounter, total: u64) {
    let current = metric.get();
    if total > current {
        metric.inc_by(total - current);
    }
}
