//! sigmine CLI
//!
//! Mines significant itemsets from a weighted transaction file and an item
//! confidence table.

use anyhow::{Context, Result};
use clap::Parser;
use sigmine::io::{read_confidence_table, read_transactions, write_report};
use sigmine::{
    mine_significant_itemsets, ConditionalOrder, MinerConfig, ReportFormat, SignificanceMeasure, TransactionDatabase,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "sigmine")]
#[command(about = "Mine significant itemsets from weighted transactions")]
#[command(version)]
struct Cli {
    /// Transaction file: record count, then `id n item weight ...` per record
    database: PathBuf,
    /// Confidence table: domain size, then `item coefficient` per item
    confidence: PathBuf,
    /// Minimum significance ratio in (0, 1]
    #[arg(long, short = 's')]
    min_significance: Option<f64>,
    /// Report destination (defaults to stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    /// JSON configuration file; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    measure: Option<SignificanceMeasure>,
    #[arg(long, value_enum)]
    conditional_order: Option<ConditionalOrder>,
    /// Always recurse, even on single-path trees
    #[arg(long)]
    no_single_path: bool,
    /// Validate candidates on all cores
    #[arg(long)]
    parallel_validation: bool,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    /// Log at debug level
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn miner_config(&self) -> Result<MinerConfig> {
        let mut config = match &self.config {
            Some(path) => MinerConfig::from_json_file(path)?,
            None => MinerConfig::default(),
        };
        if let Some(min_significance) = self.min_significance {
            config.min_significance = min_significance;
        }
        if let Some(measure) = self.measure {
            config.measure = measure;
        }
        if let Some(order) = self.conditional_order {
            config.conditional_order = order;
        }
        if self.no_single_path {
            config.single_path_shortcut = false;
        }
        if self.parallel_validation {
            config.parallel_validation = true;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = cli.miner_config()?;
    info!(
        database = %cli.database.display(),
        confidence = %cli.confidence.display(),
        min_significance = config.min_significance,
        "starting"
    );
    let started = Instant::now();

    let confidence = read_confidence_table(&cli.confidence)?;
    let transactions = read_transactions(&cli.database)?;
    let db = TransactionDatabase::new(transactions, confidence, &config)?;
    let report = mine_significant_itemsets(&db, &config)?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            write_report(&mut BufWriter::new(file), &report, cli.format, path)?;
        }
        None => {
            let stdout = std::io::stdout();
            write_report(&mut stdout.lock(), &report, cli.format, Path::new("<stdout>"))?;
        }
    }

    info!(
        reported = report.itemsets.len(),
        candidates = report.candidates,
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "completed"
    );
    Ok(())
}
