use anyhow::Result;
use clap::Parser;
use searchbench::{run, BenchConfig, CsvSink};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Times one lookup per structure for every dataset size and writes the
/// results to search_times.csv. Set RUST_LOG=debug for per-size build stats.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BenchConfig::default();
    let mut sink = CsvSink::create(&config.output)?;
    run(&config, &mut sink)?;
    info!(path = %config.output.display(), "results saved");
    Ok(())
}
