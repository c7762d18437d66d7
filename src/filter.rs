//! Conjunctive vehicle filtering over an ingested dataset.
//!
//! All criteria are optional; an unset criterion matches everything. The
//! filter is stable: output preserves ingestion order and never re-sorts.

use itertools::Itertools;

use crate::{
    dataset::Dataset,
    derive::PaymentStatus,
    record::VehicleRecord,
};

/// Filter criteria, composed conjunctively.
#[derive(Debug, Clone, Default)]
pub struct VehicleCriteria {
    /// Vehicle-type equality (case-insensitive on trimmed values).
    pub vehicle_type: Option<String>,
    /// Vehicle-status equality (case-insensitive on trimmed values).
    pub status: Option<String>,
    /// Keep only vehicles with at least one overdue installment.
    pub pending_only: bool,
    /// Case-insensitive substring over the joined searchable fields.
    pub search: Option<String>,
}

pub fn filter_vehicles<'a>(
    dataset: &'a Dataset,
    criteria: &VehicleCriteria,
) -> Vec<&'a VehicleRecord> {
    dataset
        .vehicles
        .iter()
        .filter(|vehicle| matches(dataset, vehicle, criteria))
        .collect()
}

fn matches(dataset: &Dataset, vehicle: &VehicleRecord, criteria: &VehicleCriteria) -> bool {
    if let Some(wanted) = &criteria.vehicle_type {
        if !vehicle.vehicle_type.trim().eq_ignore_ascii_case(wanted.trim()) {
            return false;
        }
    }
    if let Some(wanted) = &criteria.status {
        if !vehicle.status.trim().eq_ignore_ascii_case(wanted.trim()) {
            return false;
        }
    }
    if criteria.pending_only && !has_overdue(dataset, vehicle) {
        return false;
    }
    if let Some(needle) = &criteria.search {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty() && !search_haystack(vehicle).contains(&needle) {
            return false;
        }
    }
    true
}

/// True when the vehicle has at least one related installment currently
/// classified Overdue.
pub fn has_overdue(dataset: &Dataset, vehicle: &VehicleRecord) -> bool {
    dataset
        .related_installments(vehicle)
        .iter()
        .any(|installment| installment.display_status == PaymentStatus::Overdue)
}

// Whitespace-joined so a search can span field boundaries, matching how the
// fields read on a rendered card.
fn search_haystack(vehicle: &VehicleRecord) -> String {
    [
        &vehicle.name,
        &vehicle.brand,
        &vehicle.model,
        &vehicle.number,
        &vehicle.seller_name,
        &vehicle.seller_phone,
        &vehicle.seller_city,
        &vehicle.buyer_name,
        &vehicle.buyer_phone,
    ]
    .iter()
    .map(|field| field.as_str())
    .join(" ")
    .to_lowercase()
}
