//! Helpers for the interactive shell: prompting, input cleaning and display.

use crate::blockchain::{Ledger, Record};
use crate::config::{Config, LoggingConfig};
use crate::crypto::canonical_timestamp;
use crate::error::ChainError;
use crate::node::SharedLedger;
use crate::transaction::Transfer;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::io::{BufRead, Write};

/// Install the tracing subscriber for the shell. Logs go to stderr so they do
/// not interleave with prompts.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ChainError> {
    let level = config.level()?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

pub fn shared_ledger_from_config(config: &Config) -> SharedLedger {
    SharedLedger::new(config.ledger.difficulty).with_check_interval(config.miner.check_interval)
}

/// Drop every character that is not an ASCII digit or `.`.
///
/// `"$1,250.50"` becomes `"1250.50"`. Callers reject a `-` before cleaning,
/// see [`parse_amount`].
pub fn clean_amount(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Parse a typed amount. Currency symbols and separators are ignored, but a
/// minus sign is an error rather than being stripped into a positive value.
pub fn parse_amount(input: &str) -> Result<f64, ChainError> {
    if input.contains('-') {
        return Err(ChainError::InvalidInput(format!(
            "Negative amounts are not accepted: '{}'",
            input.trim()
        )));
    }
    let cleaned = clean_amount(input);
    let amount: f64 = cleaned
        .parse()
        .map_err(|_| ChainError::InvalidInput(format!("Invalid amount '{}'", input.trim())))?;
    if !amount.is_finite() {
        return Err(ChainError::InvalidInput(format!("Invalid amount '{}'", input.trim())));
    }
    Ok(amount)
}

pub fn parse_transfer(sender: &str, receiver: &str, amount: &str) -> Result<Transfer, ChainError> {
    let transfer = Transfer::new(sender.trim(), receiver.trim(), parse_amount(amount)?);
    transfer.validate()?;
    Ok(transfer)
}

fn prompt<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, label: &str) -> Result<Option<String>, ChainError> {
    write!(writer, "{}", label)?;
    writer.flush()?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt for sender, receiver and amount. `Ok(None)` means input ended.
pub fn prompt_transfer<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<Option<Transfer>, ChainError> {
    let Some(sender) = prompt(reader, writer, "Enter sender: ")? else {
        return Ok(None);
    };
    let Some(receiver) = prompt(reader, writer, "Enter receiver: ")? else {
        return Ok(None);
    };
    let Some(amount) = prompt(reader, writer, "Enter amount: ")? else {
        return Ok(None);
    };
    parse_transfer(&sender, &receiver, &amount).map(Some)
}

/// Display row for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub index: usize,
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<f64>,
    pub hash: String,
    pub previous_hash: String,
    pub timestamp: String,
    pub nonce: u64,
}

impl RecordView {
    pub fn new(index: usize, record: &Record) -> Self {
        Self {
            index,
            from: record.payload.as_ref().map(|p| p.sender.clone()),
            to: record.payload.as_ref().map(|p| p.receiver.clone()),
            amount: record.payload.as_ref().map(|p| p.amount),
            hash: record.hash.clone(),
            previous_hash: record.previous_hash.clone(),
            timestamp: canonical_timestamp(&record.timestamp),
            nonce: record.nonce,
        }
    }
}

pub fn record_views(ledger: &Ledger) -> Vec<RecordView> {
    ledger
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| RecordView::new(index, record))
        .collect()
}

pub fn render_json(ledger: &Ledger) -> Result<String, ChainError> {
    Ok(serde_json::to_string_pretty(&record_views(ledger))?)
}

pub fn render_table(ledger: &Ledger) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Block", "From", "To", "Amount", "Hash", "Previous Hash", "Timestamp", "Nonce"]
                .into_iter()
                .map(|h| Cell::new(h).fg(TableColor::Cyan).add_attribute(Attribute::Bold)),
        );

    for view in record_views(ledger) {
        let amount = view
            .amount
            .map(|a| format!("${:.2}", a))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(format!("#{}", view.index)).fg(TableColor::White),
            Cell::new(view.from.as_deref().unwrap_or("genesis")).fg(TableColor::Yellow),
            Cell::new(view.to.as_deref().unwrap_or("-")).fg(TableColor::Yellow),
            Cell::new(amount).fg(TableColor::Green),
            Cell::new(&view.hash).fg(TableColor::White),
            Cell::new(&view.previous_hash).fg(TableColor::Grey),
            Cell::new(&view.timestamp).fg(TableColor::Grey),
            Cell::new(view.nonce).fg(TableColor::Magenta),
        ]);
    }

    table.to_string()
}
