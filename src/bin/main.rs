#![forbid(unsafe_code)]
//! Interactive PowLedger shell: read transfers, mine them, print the ledger.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use powledger::cli::{init_logging, prompt_transfer, render_json, render_table, shared_ledger_from_config};
use powledger::config::load_config;
use powledger::error::ChainError;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./powledger.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leading zero hex digits required of each mined record
    #[arg(short, long)]
    difficulty: Option<u32>,

    /// Abandon an append after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the ledger as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(difficulty) = cli.difficulty {
        config.ledger.difficulty = difficulty;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.miner.timeout_secs = Some(timeout_secs);
    }
    config.validate()?;
    init_logging(&config.logging)?;

    let ledger = shared_ledger_from_config(&config);
    info!("Ledger ready (difficulty {})", config.ledger.difficulty);

    println!("{}", "PowLedger".bright_cyan().bold());
    println!("{}", "---------".bright_cyan());
    println!(
        "{}",
        format!("Mining difficulty: {}. Press Ctrl-D to exit.", config.ledger.difficulty).yellow()
    );
    println!();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut stdout = io::stdout();

    loop {
        let transfer = match prompt_transfer(&mut reader, &mut stdout) {
            Ok(Some(transfer)) => transfer,
            Ok(None) => break,
            Err(ChainError::InvalidInput(msg)) => {
                println!("{}", format!("{}. Please try again.", msg).red());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.set_message(format!("Mining {} -> {}...", transfer.sender, transfer.receiver));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let start = Instant::now();
        let result = match config.miner.timeout() {
            Some(limit) => ledger.append_with_timeout(transfer, limit).await,
            None => ledger.append_async(transfer, Arc::new(AtomicBool::new(false))).await,
        };
        spinner.finish_and_clear();

        match result {
            Ok(record) => {
                println!(
                    "{}",
                    format!("Mined nonce {} in {:.3}s", record.nonce, start.elapsed().as_secs_f64()).green()
                );
            }
            Err(e @ ChainError::MiningTimeout(_)) => {
                warn!("{}", e);
                println!("{}", format!("{}. The transfer was discarded.", e).red());
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        let snapshot = ledger.snapshot();
        if cli.json {
            println!("{}", render_json(&snapshot)?);
        } else {
            println!("{}", render_table(&snapshot));
        }

        let valid = snapshot.is_valid();
        let verdict = if valid { "true".green() } else { "false".red() };
        println!("Is the blockchain valid? {}", verdict.bold());
        println!();
        stdout.flush()?;
    }

    info!("Input closed after {} records", ledger.len());
    Ok(())
}
