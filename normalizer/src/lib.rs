//! # Trade statistics normalizer
//!
//! Reshapes Japan Customs trade statistics CSV exports (one row per HS code
//! and year, twelve months of three categories side by side) into a long
//! table with one row per month and category.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV files  │────▶│   Parser    │────▶│  Expander   │────▶│  Long CSV   │
//! │ (SJIS/UTF8) │     │ (auto-enc)  │     │ (HS filter) │     │ (file/out)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trade_normalizer::{run, NormalizeConfig};
//! use std::path::PathBuf;
//!
//! let config = NormalizeConfig::from_flags("", "long.csv");
//! let summary = run(&config, &[PathBuf::from("2020.csv")]).unwrap();
//! println!("Wrote {} rows", summary.rows_written);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Layered error types
//! - [`config`] - Run configuration and HS filter
//! - [`models`] - Input layout, categories, output rows
//! - [`parser`] - CSV reading with encoding detection
//! - [`transform`] - Expansion and the run pipeline
//! - [`logs`] - Status logging to stderr

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    CsvError,
    ExpandError,
    NormalizeError,
    NormalizeResult,
    OutputError,
    QuoteErrorKind,
};

// =============================================================================
// Re-exports - Configuration & Models
// =============================================================================

pub use config::{HsFilter, NormalizeConfig};

pub use models::{
    Category,
    InputTable,
    OutputRow,
    OUTPUT_HEADER,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    check_quotes,
    decode_content,
    detect_encoding,
    read_table,
    read_table_bytes,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::expander::{
    expand_record,
    expand_table,
    expand_tables,
    strip_hs_quotes,
    ExpandStats,
    Expansion,
};

pub use transform::pipeline::{
    normalize_files,
    run,
    write_output,
    write_rows,
    RunSummary,
};
