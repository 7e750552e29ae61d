//! Randstream CLI
//!
//! Prints random identifiers as hex, one per line.

use clap::Parser;
use randstream::{FileConfig, StreamGenerator};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "randstream", version, about = "Print random hex identifiers")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of identifiers to print.
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Bytes per identifier.
    #[arg(short, long)]
    length: Option<usize>,

    /// Entropy device to seed from.
    #[arg(long)]
    device: Option<PathBuf>,

    /// Print until interrupted.
    #[arg(long)]
    continuous: bool,

    /// Delay between identifiers in continuous mode.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Serve Prometheus metrics on this port (requires the `metrics` feature).
    #[arg(long)]
    metrics_port: Option<u16>,
}

fn main() {
    // Logs go to stderr so stdout carries only identifiers
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    if let Some(device) = args.device {
        config.generator.entropy_device = device;
    }
    if let Some(count) = args.count {
        config.output.count = count;
    }
    if let Some(length) = args.length {
        config.output.length = length;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.output.interval_ms = interval_ms;
    }
    if let Some(port) = args.metrics_port {
        config.output.metrics_port = port;
    }
    config.output.continuous |= args.continuous;

    if let Err(e) = config.output.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!(
        device = %config.generator.entropy_device.display(),
        "Randstream v{}",
        randstream::VERSION
    );

    let mut generator = StreamGenerator::from_config(&config.generator);
    let output = &config.output;
    let metrics = start_metrics(output.metrics_port);

    let running = Arc::new(AtomicBool::new(true));
    if output.continuous {
        let r = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut id = vec![0u8; output.length];
    let mut printed: u64 = 0;
    while running.load(Ordering::SeqCst) {
        if !output.continuous && printed >= u64::from(output.count) {
            break;
        }

        generator.fill(&mut id);
        println!("{}", id.iter().map(|b| format!("{:02x}", b)).collect::<String>());
        printed += 1;

        metrics.update(&generator.stats());

        if output.continuous {
            std::thread::sleep(Duration::from_millis(output.interval_ms));
        }
    }

    if !generator.is_seeded() {
        warn!(
            weak_reseeds = generator.weak_reseeds(),
            "Identifiers were generated from weak time-based seeds"
        );
    }
    info!("Done. Printed {} identifiers", printed);
}

#[cfg(feature = "metrics")]
struct MetricsHandle(Option<Arc<randstream::metrics::MetricsRegistry>>);

#[cfg(feature = "metrics")]
impl MetricsHandle {
    fn update(&self, stats: &randstream::GeneratorStats) {
        if let Some(registry) = &self.0 {
            registry.update(stats);
        }
    }
}

#[cfg(feature = "metrics")]
fn start_metrics(port: u16) -> MetricsHandle {
    use randstream::metrics::{MetricsRegistry, MetricsServer};

    if port == 0 {
        return MetricsHandle(None);
    }

    let registry = match MetricsRegistry::new() {
        Ok(r) => Arc::new(r),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            return MetricsHandle(None);
        }
    };
    let server = MetricsServer::loopback(port, Arc::clone(&registry));

    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                warn!("Failed to start metrics runtime: {}", e);
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            warn!("Metrics server stopped: {}", e);
        }
    });

    MetricsHandle(Some(registry))
}

#[cfg(not(feature = "metrics"))]
struct MetricsHandle;

#[cfg(not(feature = "metrics"))]
impl MetricsHandle {
    fn update(&self, _stats: &randstream::GeneratorStats) {}
}

#[cfg(not(feature = "metrics"))]
fn start_metrics(port: u16) -> MetricsHandle {
    if port != 0 {
        warn!(port, "Built without the `metrics` feature, not serving metrics");
    }
    MetricsHandle
}
