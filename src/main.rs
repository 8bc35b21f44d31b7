use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brandpulse::analytics::{SpikeDetector, TrendingDetector};
use brandpulse::config::Config;
use brandpulse::metrics;
use brandpulse::models::{read_batch, Mention};
use brandpulse::Error;
use brandpulse::topics::TopicClusterer;

#[derive(Parser)]
#[command(
    name = "brandpulse",
    version,
    about = "Spike detection and topic clustering for brand mentions",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect volume and sentiment spikes
    Spikes {
        /// Mention batch as JSON (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Cluster mentions into labelled topics
    Topics {
        /// Mention batch as JSON (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Detect keywords trending in the newest mentions
    Trending {
        /// Mention batch as JSON (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Spikes and topics in one document
    Report {
        /// Mention batch as JSON (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
    },
}

#[derive(Serialize)]
struct FullReport {
    spikes: brandpulse::analytics::SpikeReport,
    topics: Vec<brandpulse::topics::Cluster>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Invalid configuration")?;

    // Initialize tracing/logging
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    if cli.metrics {
        if let Err(e) = metrics::init_metrics() {
            tracing::warn!(error = %e, "Failed to initialize metrics");
        }
    }

    match &cli.command {
        Commands::Spikes { input } => {
            let mentions = read_mentions(input)?;
            tracing::info!(input = %input, mentions = mentions.len(), "Starting spikes command");
            let report = SpikeDetector::from_config(&config).detect(&mentions);
            print_json(&report, cli.pretty)?;
        }

        Commands::Topics { input } => {
            let mentions = read_mentions(input)?;
            tracing::info!(input = %input, mentions = mentions.len(), "Starting topics command");
            let clusters = TopicClusterer::from_config(&config).cluster(&mentions);
            print_json(&clusters, cli.pretty)?;
        }

        Commands::Trending { input } => {
            let mentions = read_mentions(input)?;
            tracing::info!(input = %input, mentions = mentions.len(), "Starting trending command");
            let detector = TrendingDetector::new(
                config.trending.clone(),
                config.spikes.dedup_prefix_chars,
            );
            print_json(&detector.detect(&mentions), cli.pretty)?;
        }

        Commands::Report { input } => {
            let mentions = read_mentions(input)?;
            tracing::info!(input = %input, mentions = mentions.len(), "Starting report command");
            let report = FullReport {
                spikes: SpikeDetector::from_config(&config).detect(&mentions),
                topics: TopicClusterer::from_config(&config).cluster(&mentions),
            };
            print_json(&report, cli.pretty)?;
        }
    }

    if cli.metrics {
        let encoded = metrics::encode_metrics()
            .map_err(|e| Error::other(format!("Failed to encode metrics: {e}")))?;
        eprint!("{encoded}");
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("brandpulse=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("brandpulse={level},warn"))
            .context("Invalid log level")?
    };

    // stdout carries the JSON result
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}

fn read_mentions(input: &str) -> Result<Vec<Mention>> {
    let batch = if input == "-" {
        read_batch(std::io::stdin().lock())
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open mentions file: {input}"))?;
        read_batch(BufReader::new(file))
    };

    batch.with_context(|| format!("Failed to read mentions from {input}"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
