//! Owned dataset snapshot, installment index, and ingestion orchestration.
//!
//! Ingestion is full-snapshot: each run fetches both sources, normalizes
//! them, derives installment status, and returns a fresh [`Dataset`]. There
//! is no process-wide current dataset and no partial update path; callers
//! replace their snapshot wholesale.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::{
    alias::HeaderResolver,
    derive,
    fetch::TextFetcher,
    record::{InstallmentRecord, VehicleRecord, assemble_fields},
    tokenize,
};

pub const DEFAULT_SEPARATOR: char = ',';

/// The two source identifiers and separator for one ingestion run.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub vehicles: String,
    pub installments: String,
    pub separator: char,
}

/// One ingested snapshot: both record collections plus the derived index.
#[derive(Debug)]
pub struct Dataset {
    pub vehicles: Vec<VehicleRecord>,
    pub installments: Vec<InstallmentRecord>,
    pub index: InstallmentIndex,
    /// Calendar day captured once at ingestion; every derived field in this
    /// snapshot was computed against it.
    pub ingested_on: NaiveDate,
}

impl Dataset {
    /// Ingests both sources against the current local calendar day.
    pub fn ingest(fetcher: &dyn TextFetcher, sources: &SourceSpec) -> Dataset {
        Self::ingest_at(fetcher, sources, Local::now().date_naive())
    }

    /// Ingests both sources against an explicit "today".
    ///
    /// A source that fails to fetch yields an empty collection and a warning;
    /// the rest of the pipeline proceeds with whatever succeeded.
    pub fn ingest_at(
        fetcher: &dyn TextFetcher,
        sources: &SourceSpec,
        today: NaiveDate,
    ) -> Dataset {
        let vehicle_rows = fetch_rows(fetcher, &sources.vehicles, sources.separator);
        let installment_rows = fetch_rows(fetcher, &sources.installments, sources.separator);

        let vehicles = normalize_vehicles(vehicle_rows);
        let mut installments = normalize_installments(installment_rows);
        for record in &mut installments {
            derive::annotate(record, today);
        }
        let index = InstallmentIndex::build(&installments);
        info!(
            "Ingested {} vehicle(s) and {} installment(s) across {} join key(s)",
            vehicles.len(),
            installments.len(),
            index.key_count()
        );
        Dataset {
            vehicles,
            installments,
            index,
            ingested_on: today,
        }
    }

    /// Finds a vehicle by identifier; duplicates shadow last-write-wins.
    pub fn vehicle_by_id(&self, vehicle_id: i64) -> Option<&VehicleRecord> {
        self.vehicles
            .iter()
            .rev()
            .find(|v| v.vehicle_id == Some(vehicle_id))
    }

    /// Resolves a vehicle's installments through the index, preferring the
    /// vehicle key and falling back to the buyer key.
    pub fn related_installments(&self, vehicle: &VehicleRecord) -> Vec<&InstallmentRecord> {
        self.index.related(vehicle, &self.installments)
    }
}

fn fetch_rows(fetcher: &dyn TextFetcher, source: &str, separator: char) -> Vec<Vec<String>> {
    match fetcher.fetch_text(source) {
        Ok(text) => tokenize::tokenize(&text, separator),
        Err(err) => {
            warn!("Fetching '{source}' failed, continuing with an empty collection: {err}");
            Vec::new()
        }
    }
}

fn normalize_vehicles(rows: Vec<Vec<String>>) -> Vec<VehicleRecord> {
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Vec::new();
    };
    let headers = HeaderResolver::vehicles().resolve_headers(header_row);
    debug!("Resolved vehicle headers: {headers:?}");
    data_rows
        .iter()
        .map(|row| VehicleRecord::from_fields(assemble_fields(&headers, row)))
        .collect()
}

fn normalize_installments(rows: Vec<Vec<String>>) -> Vec<InstallmentRecord> {
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Vec::new();
    };
    let headers = HeaderResolver::installments().resolve_headers(header_row);
    debug!("Resolved installment headers: {headers:?}");
    data_rows
        .iter()
        .map(|row| InstallmentRecord::from_fields(assemble_fields(&headers, row)))
        .collect()
}

/// Join-key lookup from vehicle/buyer identifiers to installment positions.
///
/// The index never owns records; it holds positions into the installment
/// collection it was built from and is rebuilt whenever that collection is
/// replaced.
#[derive(Debug, Default)]
pub struct InstallmentIndex {
    buckets: HashMap<String, Vec<usize>>,
}

impl InstallmentIndex {
    pub fn build(installments: &[InstallmentRecord]) -> Self {
        let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, record) in installments.iter().enumerate() {
            let vehicle_key = record.vehicle_id.map(|id| id.to_string());
            let buyer_key = record.buyer_id.map(|id| id.to_string());
            if let Some(key) = &vehicle_key {
                buckets.entry(key.clone()).or_default().push(position);
            }
            // Same numeric id on both keys would double-insert into one
            // bucket; keep each record once per key.
            if let Some(key) = buyer_key {
                if vehicle_key.as_deref() != Some(key.as_str()) {
                    buckets.entry(key).or_default().push(position);
                }
            }
        }
        Self { buckets }
    }

    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Positions indexed under one join key; empty slice when absent.
    pub fn lookup(&self, key: &str) -> &[usize] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolves a vehicle's installments: direct vehicle-key matches first,
    /// buyer-key fallback when there are none, deduplicated by record
    /// identity and in collection order.
    pub fn related<'a>(
        &self,
        vehicle: &VehicleRecord,
        installments: &'a [InstallmentRecord],
    ) -> Vec<&'a InstallmentRecord> {
        let mut positions: Vec<usize> = Vec::new();
        if let Some(id) = vehicle.vehicle_id {
            positions.extend_from_slice(self.lookup(&id.to_string()));
        }
        if positions.is_empty() {
            if let Some(id) = vehicle.buyer_id {
                positions.extend_from_slice(self.lookup(&id.to_string()));
            }
        }
        positions.sort_unstable();
        positions.dedup();
        positions
            .into_iter()
            .filter_map(|position| installments.get(position))
            .collect()
    }
}
