//! Flat-file inputs and the itemset report.
//!
//! Both inputs are whitespace-separated token streams; line breaks carry no
//! meaning.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{MiningError, Result};
use crate::fp::{ConfidenceTable, MiningReport, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
    origin: &'a Path,
    consumed: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str, origin: &'a Path) -> Self {
        Self {
            inner: text.split_whitespace(),
            origin,
            consumed: 0,
        }
    }

    fn error(&self, message: String) -> MiningError {
        MiningError::Parse {
            path: self.origin.to_path_buf(),
            message,
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| self.error(format!("unexpected end of input, expected {what}")))?;
        self.consumed += 1;
        token
            .parse()
            .map_err(|_| self.error(format!("token {} ({token:?}) is not a valid {what}", self.consumed)))
    }

    fn finish(mut self) -> Result<()> {
        match self.inner.next() {
            Some(extra) => Err(self.error(format!("trailing token {extra:?} after the last record"))),
            None => Ok(()),
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| MiningError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Record count, then per record: id, item count, `(item, weight)` pairs.
pub fn parse_transactions(text: &str, origin: &Path) -> Result<Vec<Transaction>> {
    let mut tokens = Tokens::new(text, origin);
    let count: usize = tokens.next("record count")?;
    let mut transactions = Vec::with_capacity(count.min(1 << 16));

    for _ in 0..count {
        let id: usize = tokens.next("transaction id")?;
        let len: usize = tokens.next("item count")?;
        let mut items = Vec::with_capacity(len.min(1 << 10));
        for _ in 0..len {
            let item: usize = tokens.next("item id")?;
            let weight: u64 = tokens.next("item weight")?;
            items.push((item, weight));
        }
        transactions.push(Transaction::new(id, items));
    }

    tokens.finish()?;
    Ok(transactions)
}

/// Domain size, then per item: `(item, coefficient)`.
pub fn parse_confidence_table(text: &str, origin: &Path) -> Result<ConfidenceTable> {
    let mut tokens = Tokens::new(text, origin);
    let domain_size: usize = tokens.next("item-domain size")?;
    let mut table = ConfidenceTable::new(domain_size);

    for _ in 0..domain_size {
        let item: usize = tokens.next("item id")?;
        let coefficient: f64 = tokens.next("confidence coefficient")?;
        table.set(item, coefficient)?;
    }

    tokens.finish()?;
    Ok(table)
}

pub fn read_transactions(path: &Path) -> Result<Vec<Transaction>> {
    parse_transactions(&read_file(path)?, path)
}

pub fn read_confidence_table(path: &Path) -> Result<ConfidenceTable> {
    parse_confidence_table(&read_file(path)?, path)
}

/// Writes `report`; `destination` only labels I/O errors.
pub fn write_report<W: Write>(
    writer: &mut W,
    report: &MiningReport,
    format: ReportFormat,
    destination: &Path,
) -> Result<()> {
    let io_error = |source: std::io::Error| MiningError::Io {
        path: PathBuf::from(destination),
        source,
    };

    match format {
        ReportFormat::Text => {
            writeln!(writer, "Found significant itemsets:").map_err(io_error)?;
            for itemset in &report.itemsets {
                let items: Vec<String> = itemset.items.iter().map(ToString::to_string).collect();
                writeln!(writer, "{{ {} }}", items.join(" ")).map_err(io_error)?;
            }
            writeln!(writer).map_err(io_error)?;
            writeln!(writer, "Found ({}) significant itemsets", report.itemsets.len()).map_err(io_error)?;
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report).map_err(|e| io_error(e.into()))?;
            writeln!(writer).map_err(io_error)?;
        }
    }
    writer.flush().map_err(io_error)
}
