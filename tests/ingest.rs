//! End-to-end ingestion tests: fetch, tokenize, alias resolution,
//! normalization, derivation, and index construction through the public API.

mod common;

use chrono::NaiveDate;
use fleetledger::{
    dataset::{Dataset, SourceSpec},
    derive::PaymentStatus,
    fetch::FileFetcher,
    filter::{self, VehicleCriteria},
};

use common::TestWorkspace;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn ingest(workspace: &TestWorkspace, vehicles: &str, emi: &str, today: NaiveDate) -> Dataset {
    let (vehicles_path, emi_path) = workspace.write_sources(vehicles, emi);
    let sources = SourceSpec {
        vehicles: vehicles_path.to_str().expect("utf-8 path").to_string(),
        installments: emi_path.to_str().expect("utf-8 path").to_string(),
        separator: ',',
    };
    Dataset::ingest_at(&FileFetcher::default(), &sources, today)
}

#[test]
fn minimal_snapshot_normalizes_status_and_defaults() {
    let workspace = TestWorkspace::new();
    let dataset = ingest(
        &workspace,
        "vehicle_id,status\n1,Sold\n2,\n",
        "vehicle_id,emi_no\n",
        day(2024, 2, 1),
    );
    assert_eq!(dataset.vehicles.len(), 2);
    assert_eq!(dataset.vehicles[0].vehicle_id, Some(1));
    assert_eq!(dataset.vehicles[0].status, "Sold");
    assert_eq!(dataset.vehicles[1].vehicle_id, Some(2));
    assert_eq!(dataset.vehicles[1].status, "");
    assert!(dataset.installments.is_empty());
}

#[test]
fn derivation_covers_paid_overdue_and_upcoming() {
    let workspace = TestWorkspace::new();
    let emi = "vehicle_id,emi_no,due_date,paid_date\n\
               1,1,2024-01-01,2024-01-10\n\
               1,2,2024-01-01,\n\
               1,3,2099-01-01,\n";
    let dataset = ingest(&workspace, "vehicle_id\n1\n", emi, day(2024, 2, 1));
    let records = &dataset.installments;
    assert_eq!(records[0].computed_delay_days, Some(9));
    assert_eq!(records[0].display_status, PaymentStatus::Paid);
    assert_eq!(records[1].computed_delay_days, Some(31));
    assert_eq!(records[1].display_status, PaymentStatus::Overdue);
    assert_eq!(records[2].computed_delay_days, None);
    assert_eq!(records[2].display_status, PaymentStatus::Upcoming);
}

#[test]
fn aliased_headers_resolve_and_buyer_key_joins() {
    let workspace = TestWorkspace::new();
    // No vehicle_id on the installment row; the join must fall back to the
    // buyer key resolved from the "Buyer Id" spelling.
    let dataset = ingest(
        &workspace,
        "Vehicle Id,Buyer Id,Seller Name\n12,7,Madan\n",
        "Buyer Id,EMI No,Due Date\n7,1,2024-01-01\n",
        day(2024, 2, 1),
    );
    assert_eq!(dataset.vehicles[0].vehicle_id, Some(12));
    assert_eq!(dataset.vehicles[0].buyer_id, Some(7));
    assert_eq!(dataset.vehicles[0].seller_name, "Madan");

    let related = dataset.related_installments(&dataset.vehicles[0]);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].emi_no, Some(1));
    assert_eq!(related[0].display_status, PaymentStatus::Overdue);
}

#[test]
fn quoted_fields_survive_the_whole_pipeline() {
    let workspace = TestWorkspace::new();
    let vehicles = "vehicle_id,name,buyer_address\n\
                    1,\"Splendor, Plus\",\"12-3 Main Rd\nGuntur\"\n";
    let dataset = ingest(&workspace, vehicles, "vehicle_id\n", day(2024, 2, 1));
    assert_eq!(dataset.vehicles[0].name, "Splendor, Plus");
    assert_eq!(dataset.vehicles[0].buyer_address, "12-3 Main Rd\nGuntur");
}

#[test]
fn unknown_columns_ride_along_as_extras() {
    let workspace = TestWorkspace::new();
    let dataset = ingest(
        &workspace,
        "vehicle_id,Chassis Number\n1,MB1234\n",
        "vehicle_id\n",
        day(2024, 2, 1),
    );
    assert_eq!(
        dataset.vehicles[0].extra.get("Chassis Number").map(String::as_str),
        Some("MB1234")
    );
}

#[test]
fn duplicate_headers_keep_first_nonempty_value() {
    let workspace = TestWorkspace::new();
    let dataset = ingest(
        &workspace,
        "vehicle_id,Status,status\n1,,Sold\n",
        "vehicle_id\n",
        day(2024, 2, 1),
    );
    assert_eq!(dataset.vehicles[0].status, "Sold");
}

#[test]
fn blank_lines_are_skipped() {
    let workspace = TestWorkspace::new();
    let dataset = ingest(
        &workspace,
        "vehicle_id,status\n\n1,Sold\n   ,   \n2,\n\n",
        "vehicle_id\n",
        day(2024, 2, 1),
    );
    assert_eq!(dataset.vehicles.len(), 2);
}

#[test]
fn missing_source_degrades_to_empty_collection() {
    let workspace = TestWorkspace::new();
    let vehicles_path = workspace.write("full.csv", "vehicle_id,status\n1,Sold\n");
    let sources = SourceSpec {
        vehicles: vehicles_path.to_str().expect("utf-8 path").to_string(),
        installments: workspace
            .path()
            .join("missing-emi.csv")
            .to_str()
            .expect("utf-8 path")
            .to_string(),
        separator: ',',
    };
    let dataset = Dataset::ingest_at(&FileFetcher::default(), &sources, day(2024, 2, 1));
    assert_eq!(dataset.vehicles.len(), 1);
    assert!(dataset.installments.is_empty());
    assert!(dataset.related_installments(&dataset.vehicles[0]).is_empty());
}

#[test]
fn pending_filter_uses_the_index_with_fallback() {
    let workspace = TestWorkspace::new();
    let vehicles = "vehicle_id,buyer_id,type,status\n\
                    1,7,Bike,Sold\n\
                    2,8,Bike,Sold\n";
    let emi = "buyer_id,emi_no,due_date\n7,1,2024-01-01\n8,1,2099-01-01\n";
    let dataset = ingest(&workspace, vehicles, emi, day(2024, 2, 1));

    let criteria = VehicleCriteria {
        pending_only: true,
        ..Default::default()
    };
    let pending = filter::filter_vehicles(&dataset, &criteria);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].vehicle_id, Some(1));
    assert!(filter::has_overdue(&dataset, &dataset.vehicles[0]));
    assert!(!filter::has_overdue(&dataset, &dataset.vehicles[1]));
}

#[test]
fn semicolon_separator_is_honored_end_to_end() {
    let workspace = TestWorkspace::new();
    let (vehicles_path, emi_path) = workspace.write_sources(
        "vehicle_id;status\n1;Sold\n",
        "vehicle_id;due_date\n1;2024-01-01\n",
    );
    let sources = SourceSpec {
        vehicles: vehicles_path.to_str().expect("utf-8 path").to_string(),
        installments: emi_path.to_str().expect("utf-8 path").to_string(),
        separator: ';',
    };
    let dataset = Dataset::ingest_at(&FileFetcher::default(), &sources, day(2024, 2, 1));
    assert_eq!(dataset.vehicles[0].status, "Sold");
    assert_eq!(dataset.installments[0].display_status, PaymentStatus::Overdue);
}
