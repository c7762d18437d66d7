//! Typed record structs and the row normalizer.
//!
//! A raw row plus its resolved headers becomes a field map
//! ([`assemble_fields`]) and then a typed record. Coercion never fails: empty
//! or unparsable integers become `None`, absent strings become `""`, and
//! columns outside the canonical set ride along in each record's `extra` map.

use std::collections::BTreeMap;

use crate::derive::PaymentStatus;

/// One inventory item with optional seller/buyer/finance provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    pub vehicle_id: Option<i64>,
    pub name: String,
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub number: String,
    pub status: String,
    pub seller_name: String,
    pub seller_phone: String,
    pub seller_city: String,
    pub buy_value: Option<i64>,
    pub buy_date: String,
    pub buyer_id: Option<i64>,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_address: String,
    pub sale_value: Option<i64>,
    pub finance_amount: Option<i64>,
    pub tenure: Option<i64>,
    pub sale_date: String,
    /// Unrecognized columns, preserved verbatim.
    pub extra: BTreeMap<String, String>,
}

/// One scheduled payment obligation tied to a vehicle or buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentRecord {
    pub vehicle_id: Option<i64>,
    pub buyer_id: Option<i64>,
    pub emi_no: Option<i64>,
    pub due_date: String,
    pub paid_date: String,
    pub amount: Option<i64>,
    /// Raw origin status text; distinct from the derived [`display_status`].
    ///
    /// [`display_status`]: InstallmentRecord::display_status
    pub status: String,
    /// Source-provided delay column, passed through untouched when present.
    pub delay_days: Option<i64>,
    pub extra: BTreeMap<String, String>,
    /// Derived once at ingestion; see [`crate::derive::annotate`].
    pub computed_delay_days: Option<i64>,
    pub display_status: PaymentStatus,
}

/// Zips resolved headers with one raw row into a field map.
///
/// When two raw headers resolve to the same canonical name, the first
/// non-empty value wins and later duplicates are ignored. Rows shorter than
/// the header set pad with `""`; fields beyond the header count are dropped.
pub fn assemble_fields(headers: &[String], row: &[String]) -> BTreeMap<String, String> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    for (idx, header) in headers.iter().enumerate() {
        let value = row.get(idx).map(String::as_str).unwrap_or("");
        let slot = fields.entry(header.clone()).or_default();
        if slot.is_empty() && !value.is_empty() {
            *slot = value.to_string();
        }
    }
    fields
}

/// Base-10 parse of a leading integer prefix: optional sign, then digits,
/// trailing non-digits ignored. Empty or digit-free input yields `None`.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let prefix_len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if prefix_len == 0 {
        return None;
    }
    let magnitude: i64 = digits[..prefix_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn take(fields: &mut BTreeMap<String, String>, key: &str) -> String {
    fields.remove(key).unwrap_or_default()
}

fn take_int(fields: &mut BTreeMap<String, String>, key: &str) -> Option<i64> {
    parse_int_prefix(&take(fields, key))
}

impl VehicleRecord {
    /// Builds a vehicle record from canonically-keyed fields; leftover keys
    /// land in `extra`.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        Self {
            vehicle_id: take_int(&mut fields, "vehicle_id"),
            name: take(&mut fields, "name"),
            vehicle_type: take(&mut fields, "type"),
            brand: take(&mut fields, "brand"),
            model: take(&mut fields, "model"),
            color: take(&mut fields, "color"),
            number: take(&mut fields, "number"),
            status: take(&mut fields, "status"),
            seller_name: take(&mut fields, "seller_name"),
            seller_phone: take(&mut fields, "seller_phone"),
            seller_city: take(&mut fields, "seller_city"),
            buy_value: take_int(&mut fields, "buy_value"),
            buy_date: take(&mut fields, "buy_date"),
            buyer_id: take_int(&mut fields, "buyer_id"),
            buyer_name: take(&mut fields, "buyer_name"),
            buyer_phone: take(&mut fields, "buyer_phone"),
            buyer_address: take(&mut fields, "buyer_address"),
            sale_value: take_int(&mut fields, "sale_value"),
            finance_amount: take_int(&mut fields, "finance_amount"),
            tenure: take_int(&mut fields, "tenure"),
            sale_date: take(&mut fields, "sale_date"),
            extra: fields,
        }
    }
}

impl InstallmentRecord {
    /// Builds an installment record from canonically-keyed fields. Derived
    /// fields start empty and are stamped by [`crate::derive::annotate`]
    /// during ingestion.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        Self {
            vehicle_id: take_int(&mut fields, "vehicle_id"),
            buyer_id: take_int(&mut fields, "buyer_id"),
            emi_no: take_int(&mut fields, "emi_no"),
            due_date: take(&mut fields, "due_date"),
            paid_date: take(&mut fields, "paid_date"),
            amount: take_int(&mut fields, "amount"),
            status: take(&mut fields, "status"),
            delay_days: take_int(&mut fields, "delay_days"),
            extra: fields,
            computed_delay_days: None,
            display_status: PaymentStatus::Upcoming,
        }
    }
}
