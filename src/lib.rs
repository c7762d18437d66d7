pub mod alias;
pub mod cli;
pub mod dataset;
pub mod derive;
pub mod fetch;
pub mod filter;
pub mod manifest;
pub mod record;
pub mod report;
pub mod table;
pub mod tokenize;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("fleetledger", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Summary(args) => report::summary(&args),
        Commands::List(args) => report::list(&args),
        Commands::View(args) => report::view(&args),
        Commands::Export(args) => report::export(&args),
    }
}
