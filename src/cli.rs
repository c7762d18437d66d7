use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Ingest and query vehicle finance CSV snapshots", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print headline counts for the current snapshot
    Summary(SourceArgs),
    /// List vehicles matching the given filters
    List(ListArgs),
    /// Show one vehicle with its installment schedule
    View(ViewArgs),
    /// Write the normalized collections back out as CSV
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Vehicle inventory source (file path or http(s) URL)
    #[arg(long)]
    pub vehicles: Option<String>,
    /// Installment schedule source (file path or http(s) URL)
    #[arg(long)]
    pub emi: Option<String>,
    /// YAML manifest naming both sources
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Keep only vehicles of this type
    #[arg(long = "vehicle-type")]
    pub vehicle_type: Option<String>,
    /// Keep only vehicles with this status (e.g. Sold)
    #[arg(long)]
    pub status: Option<String>,
    /// Keep only vehicles with at least one overdue installment
    #[arg(long)]
    pub pending: bool,
    /// Case-insensitive substring match across name, brand, model, number,
    /// and contact fields
    #[arg(long)]
    pub search: Option<String>,
    /// Limit number of rows printed
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Vehicle identifier to show
    #[arg(long = "id")]
    pub vehicle_id: i64,
    /// Show only overdue installments
    #[arg(long = "pending-only")]
    pub pending_only: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Directory to write vehicles.csv and emi.csv into
    #[arg(short = 'o', long = "out-dir")]
    pub out_dir: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "tab" | "\t" => Ok('\t'),
        "comma" | "," => Ok(','),
        "|" | "pipe" => Ok('|'),
        ";" | "semicolon" => Ok(';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first)
        }
    }
}
