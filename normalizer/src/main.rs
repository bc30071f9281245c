//! trade-statistics-normalizer CLI
//!
//! ```bash
//! trade-statistics-normalizer 2020.csv 2021.csv > long.csv
//! trade-statistics-normalizer -f 010121000,010129000 -o horses.csv 2020.csv
//! ```

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use trade_normalizer::logs::log_error;
use trade_normalizer::{run, NormalizeConfig, NormalizeError};

#[derive(Parser)]
#[command(name = "trade-statistics-normalizer", version)]
#[command(about = "A simple normalizer for Japan Customs trade statistics")]
#[command(long_about = "trade-statistics-normalizer normalizes Japan Customs trade statistics data.

The statistics published by Japan Customs are plain wide CSV files: one row per
HS code and year, with twelve months of Quantity1, Quantity2 and Volume side by
side. Most uses need them in long form, one row per month and category.
This tool does that reshaping.")]
struct Cli {
    /// HS code filter, comma separated. Default is all.
    #[arg(short, long, default_value = "")]
    filter: String,

    /// Output file name. Default is STDOUT.
    #[arg(short, long, default_value = "")]
    out: String,

    /// Input CSV files, processed in order
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if cli.inputs.is_empty() {
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(NormalizeError::Usage.exit_code());
    }

    let config = NormalizeConfig::from_flags(&cli.filter, &cli.out);

    if let Err(e) = run(&config, &cli.inputs) {
        log_error("Run failed");
        println!("{}", e);
        std::process::exit(e.exit_code());
    }
}
