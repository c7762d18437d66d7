//! YAML source manifest: names the two sources once instead of repeating
//! `--vehicles`/`--emi` on every invocation. CLI flags override manifest
//! entries.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::{
    cli::SourceArgs,
    dataset::{DEFAULT_SEPARATOR, SourceSpec},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceManifest {
    pub vehicles: Option<String>,
    pub emi: Option<String>,
    pub delimiter: Option<char>,
}

impl SourceManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening manifest {path:?}"))?;
        serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing manifest {path:?}"))
    }
}

/// Merges CLI flags over an optional manifest into one [`SourceSpec`].
pub fn resolve_sources(args: &SourceArgs) -> Result<SourceSpec> {
    let manifest = match &args.manifest {
        Some(path) => SourceManifest::load(path)?,
        None => SourceManifest::default(),
    };
    let vehicles = args
        .vehicles
        .clone()
        .or(manifest.vehicles)
        .ok_or_else(|| anyhow!("No vehicle source given; pass --vehicles or use a manifest"))?;
    let installments = args
        .emi
        .clone()
        .or(manifest.emi)
        .ok_or_else(|| anyhow!("No installment source given; pass --emi or use a manifest"))?;
    Ok(SourceSpec {
        vehicles,
        installments,
        separator: args.delimiter.or(manifest.delimiter).unwrap_or(DEFAULT_SEPARATOR),
    })
}
