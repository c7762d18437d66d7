//! Command executors: the terminal-facing consumers of an ingested dataset.
//!
//! Everything here reads the dataset and never mutates it; the pipeline
//! modules own all normalization and derivation.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result};
use csv::QuoteStyle;
use encoding_rs::UTF_8;
use log::info;

use crate::{
    alias::{INSTALLMENT_FIELDS, VEHICLE_FIELDS},
    cli::{ExportArgs, ListArgs, SourceArgs, ViewArgs},
    dataset::Dataset,
    derive::PaymentStatus,
    fetch::AutoFetcher,
    filter::{self, VehicleCriteria},
    manifest,
    record::{InstallmentRecord, VehicleRecord},
    table,
};

/// Headline counts for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub total: usize,
    pub in_stock: usize,
    pub sold: usize,
    /// Vehicles with at least one overdue installment.
    pub pending: usize,
}

pub fn summarize(dataset: &Dataset) -> SnapshotSummary {
    let sold = dataset
        .vehicles
        .iter()
        .filter(|v| v.status.trim().eq_ignore_ascii_case("sold"))
        .count();
    let pending = dataset
        .vehicles
        .iter()
        .filter(|v| filter::has_overdue(dataset, v))
        .count();
    SnapshotSummary {
        total: dataset.vehicles.len(),
        in_stock: dataset.vehicles.len() - sold,
        sold,
        pending,
    }
}

pub fn load_dataset(args: &SourceArgs) -> Result<Dataset> {
    let sources = manifest::resolve_sources(args)?;
    let fetcher = AutoFetcher::new(UTF_8)?;
    Ok(Dataset::ingest(&fetcher, &sources))
}

pub fn summary(args: &SourceArgs) -> Result<()> {
    let dataset = load_dataset(args)?;
    let counts = summarize(&dataset);
    println!("Vehicles:  {}", counts.total);
    println!("In stock:  {}", counts.in_stock);
    println!("Sold:      {}", counts.sold);
    println!("Pending:   {}", counts.pending);
    Ok(())
}

pub fn list(args: &ListArgs) -> Result<()> {
    let dataset = load_dataset(&args.source)?;
    let criteria = VehicleCriteria {
        vehicle_type: args.vehicle_type.clone(),
        status: args.status.clone(),
        pending_only: args.pending,
        search: args.search.clone(),
    };
    let mut matched = filter::filter_vehicles(&dataset, &criteria);
    let total = matched.len();
    if let Some(limit) = args.limit {
        matched.truncate(limit);
    }

    let headers = ["id", "name", "type", "brand", "number", "status"]
        .map(str::to_string)
        .to_vec();
    let rows: Vec<Vec<String>> = matched
        .iter()
        .map(|v| {
            vec![
                opt_int(v.vehicle_id),
                v.name.clone(),
                v.vehicle_type.clone(),
                v.brand.clone(),
                v.number.clone(),
                v.status.clone(),
            ]
        })
        .collect();
    table::print_table(&headers, &rows);
    if rows.len() < total {
        println!("({} of {} matching vehicle(s) shown)", rows.len(), total);
    }
    Ok(())
}

pub fn view(args: &ViewArgs) -> Result<()> {
    let dataset = load_dataset(&args.source)?;
    let Some(vehicle) = dataset.vehicle_by_id(args.vehicle_id) else {
        println!("Vehicle {} not found", args.vehicle_id);
        return Ok(());
    };

    println!("{} ({})", vehicle.name, vehicle.vehicle_type);
    println!("{} • {} • {}", vehicle.brand, vehicle.model, vehicle.color);
    println!("Number: {}", vehicle.number);

    println!();
    if vehicle.seller_name.is_empty() {
        println!("No seller info");
    } else {
        println!("Seller: {}", vehicle.seller_name);
        println!("Phone:  {}", vehicle.seller_phone);
        println!("City:   {}", vehicle.seller_city);
        if let Some(value) = vehicle.buy_value {
            println!("Buy value: ₹{value}");
        }
        println!("Buy date:  {}", vehicle.buy_date);
    }

    let mut installments = dataset.related_installments(vehicle);
    if args.pending_only {
        installments.retain(|e| e.display_status == PaymentStatus::Overdue);
    }
    println!();
    if installments.is_empty() {
        println!("No EMIs found");
        return Ok(());
    }
    let headers = ["emi", "due date", "amount", "status", "delay"]
        .map(str::to_string)
        .to_vec();
    let rows: Vec<Vec<String>> = installments
        .iter()
        .map(|e| {
            vec![
                opt_int(e.emi_no),
                e.due_date.clone(),
                e.amount.map(|a| format!("₹{a}")).unwrap_or_default(),
                e.display_status.to_string(),
                display_delay(e),
            ]
        })
        .collect();
    table::print_table(&headers, &rows);
    Ok(())
}

pub fn export(args: &ExportArgs) -> Result<()> {
    let dataset = load_dataset(&args.source)?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Creating output directory {:?}", args.out_dir))?;

    let vehicles_path = args.out_dir.join("vehicles.csv");
    export_vehicles(&dataset.vehicles, &vehicles_path)?;
    let installments_path = args.out_dir.join("emi.csv");
    export_installments(&dataset.installments, &installments_path)?;

    info!(
        "Exported {} vehicle(s) to {:?} and {} installment(s) to {:?}",
        dataset.vehicles.len(),
        vehicles_path,
        dataset.installments.len(),
        installments_path
    );
    Ok(())
}

// The computed figure wins; an undated upcoming installment falls back to the
// source-provided delay column when one existed.
fn display_delay(installment: &InstallmentRecord) -> String {
    installment
        .computed_delay_days
        .or(installment.delay_days)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

fn opt_int(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn open_export_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    let mut builder = csv::WriterBuilder::new();
    // Always-quote output round-trips cleanly through any reader.
    builder.quote_style(QuoteStyle::Always).double_quote(true);
    builder
        .from_path(path)
        .with_context(|| format!("Creating output file {path:?}"))
}

fn extra_columns<'a, I>(extras: I) -> Vec<String>
where
    I: Iterator<Item = &'a std::collections::BTreeMap<String, String>>,
{
    let mut keys = BTreeSet::new();
    for extra in extras {
        keys.extend(extra.keys().cloned());
    }
    keys.into_iter().collect()
}

fn export_vehicles(vehicles: &[VehicleRecord], path: &Path) -> Result<()> {
    let extras = extra_columns(vehicles.iter().map(|v| &v.extra));
    let mut writer = open_export_writer(path)?;
    let mut columns: Vec<&str> = VEHICLE_FIELDS.to_vec();
    columns.extend(extras.iter().map(String::as_str));
    writer
        .write_record(&columns)
        .with_context(|| format!("Writing headers to {path:?}"))?;
    for vehicle in vehicles {
        let row: Vec<String> = columns.iter().map(|c| vehicle_field(vehicle, c)).collect();
        writer
            .write_record(&row)
            .with_context(|| format!("Writing row to {path:?}"))?;
    }
    writer.flush().with_context(|| format!("Flushing {path:?}"))?;
    Ok(())
}

fn export_installments(installments: &[InstallmentRecord], path: &Path) -> Result<()> {
    let extras = extra_columns(installments.iter().map(|e| &e.extra));
    let mut writer = open_export_writer(path)?;
    let mut columns: Vec<&str> = INSTALLMENT_FIELDS.to_vec();
    columns.extend(["computed_delay_days", "display_status"]);
    columns.extend(extras.iter().map(String::as_str));
    writer
        .write_record(&columns)
        .with_context(|| format!("Writing headers to {path:?}"))?;
    for installment in installments {
        let row: Vec<String> = columns
            .iter()
            .map(|c| installment_field(installment, c))
            .collect();
        writer
            .write_record(&row)
            .with_context(|| format!("Writing row to {path:?}"))?;
    }
    writer.flush().with_context(|| format!("Flushing {path:?}"))?;
    Ok(())
}

fn vehicle_field(vehicle: &VehicleRecord, name: &str) -> String {
    match name {
        "vehicle_id" => opt_int(vehicle.vehicle_id),
        "type" => vehicle.vehicle_type.clone(),
        "brand" => vehicle.brand.clone(),
        "model" => vehicle.model.clone(),
        "color" => vehicle.color.clone(),
        "number" => vehicle.number.clone(),
        "status" => vehicle.status.clone(),
        "name" => vehicle.name.clone(),
        "seller_name" => vehicle.seller_name.clone(),
        "seller_phone" => vehicle.seller_phone.clone(),
        "seller_city" => vehicle.seller_city.clone(),
        "buy_value" => opt_int(vehicle.buy_value),
        "buy_date" => vehicle.buy_date.clone(),
        "buyer_id" => opt_int(vehicle.buyer_id),
        "buyer_name" => vehicle.buyer_name.clone(),
        "buyer_phone" => vehicle.buyer_phone.clone(),
        "buyer_address" => vehicle.buyer_address.clone(),
        "sale_value" => opt_int(vehicle.sale_value),
        "finance_amount" => opt_int(vehicle.finance_amount),
        "tenure" => opt_int(vehicle.tenure),
        "sale_date" => vehicle.sale_date.clone(),
        other => vehicle.extra.get(other).cloned().unwrap_or_default(),
    }
}

fn installment_field(installment: &InstallmentRecord, name: &str) -> String {
    match name {
        "vehicle_id" => opt_int(installment.vehicle_id),
        "buyer_id" => opt_int(installment.buyer_id),
        "emi_no" => opt_int(installment.emi_no),
        "due_date" => installment.due_date.clone(),
        "paid_date" => installment.paid_date.clone(),
        "amount" => opt_int(installment.amount),
        "status" => installment.status.clone(),
        "delay_days" => opt_int(installment.delay_days),
        "computed_delay_days" => opt_int(installment.computed_delay_days),
        "display_status" => installment.display_status.to_string(),
        other => installment.extra.get(other).cloned().unwrap_or_default(),
    }
}
