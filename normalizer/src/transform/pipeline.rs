//! End-to-end run: read inputs, expand, write the long table.
//!
//! Everything is held in memory and written once at the end. The output
//! file is only created after every input expanded cleanly, so a failed
//! run leaves no partial file behind.
//!
//! # Example
//!
//! ```rust,ignore
//! use trade_normalizer::{run, NormalizeConfig};
//! use std::path::PathBuf;
//!
//! let config = NormalizeConfig::from_flags("0101,0102", "long.csv");
//! let summary = run(&config, &[PathBuf::from("2020.csv")])?;
//! println!("{} rows written", summary.rows_written);
//! ```

use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::expander::{expand_table, Expansion};
use crate::config::{HsFilter, NormalizeConfig};
use crate::error::{NormalizeError, NormalizeResult, OutputError, OutputResult};
use crate::logs::{log_info, log_info_indent, log_success, log_success_indent, log_warning};
use crate::models::{OutputRow, OUTPUT_HEADER};
use crate::parser::read_table;

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_read: usize,
    pub data_rows: usize,
    pub filtered_rows: usize,
    pub skipped_categories: usize,
    pub rows_written: usize,
    /// Output file, `None` for stdout
    pub destination: Option<PathBuf>,
}

/// Run the whole normalization.
pub fn run(config: &NormalizeConfig, inputs: &[PathBuf]) -> NormalizeResult<RunSummary> {
    if inputs.is_empty() {
        return Err(NormalizeError::Usage);
    }

    if config.filter.is_active() {
        let codes: Vec<&str> = config.filter.codes().collect();
        log_info(format!("🔎 HS filter: {}", codes.join(", ")));
    }

    let expansion = normalize_files(inputs, &config.filter)?;

    if config.filter.is_active() && expansion.stats.data_rows > 0 && expansion.rows.is_empty() {
        log_warning("No rows matched the HS filter");
    }

    write_output(&expansion.rows, config.out.as_deref())?;

    let stats = expansion.stats;
    Ok(RunSummary {
        files_read: inputs.len(),
        data_rows: stats.data_rows,
        filtered_rows: stats.filtered_rows,
        skipped_categories: stats.skipped_categories,
        rows_written: expansion.rows.len(),
        destination: config.out.clone(),
    })
}

/// Read and expand every input file, in the order given.
pub fn normalize_files(inputs: &[PathBuf], filter: &HsFilter) -> NormalizeResult<Expansion> {
    let mut expansion = Expansion::default();

    for path in inputs {
        log_info(format!("📖 Reading {}", path.display()));
        let table = read_table(path)?;
        log_info_indent(format!("Encoding: {}", table.encoding), 1);
        if let Some(header) = table.header() {
            log_info_indent(format!("Columns: {}", header.len()), 1);
        }
        log_info_indent(format!("Data rows: {}", table.data_row_count()), 1);

        let stats = expand_table(&table, filter, &mut expansion.rows)?;
        if stats.filtered_rows > 0 {
            log_info_indent(format!("Filtered out: {} rows", stats.filtered_rows), 1);
        }
        if stats.skipped_categories > 0 {
            log_info_indent(
                format!("Categories without data: {}", stats.skipped_categories),
                1,
            );
        }
        log_success_indent(format!("Expanded to {} rows", stats.emitted_rows), 1);

        expansion.stats.merge(stats);
    }

    Ok(expansion)
}

/// Write header and rows as CSV, then flush.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> OutputResult<()> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the table to `path`, or stdout when `None`.
pub fn write_output(rows: &[OutputRow], path: Option<&Path>) -> OutputResult<()> {
    match path {
        Some(p) => {
            let file = File::create(p).map_err(|error| OutputError::Create {
                path: p.to_path_buf(),
                error,
            })?;
            write_rows(BufWriter::new(file), rows)?;
            log_success(format!("💾 {} rows written to {}", rows.len(), p.display()));
        }
        None => {
            let stdout = std::io::stdout();
            write_rows(BufWriter::new(stdout.lock()), rows)?;
            log_success(format!("{} rows written to stdout", rows.len()));
        }
    }
    Ok(())
}
