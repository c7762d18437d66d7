//! Canonical field names and header alias resolution.
//!
//! Snapshot exports spell the same column many ways ("Seller Name",
//! `seller_name`, `SellerName`, "Seller"). Headers are reduced to a
//! normalization key (lowercase, non-alphanumerics stripped) and looked up in a
//! per-source alias table; unrecognized headers pass through verbatim so no
//! column is silently lost.

use std::collections::HashMap;

/// Canonical column names for vehicle-inventory rows.
pub const VEHICLE_FIELDS: &[&str] = &[
    "vehicle_id",
    "type",
    "brand",
    "model",
    "color",
    "number",
    "status",
    "name",
    "seller_name",
    "seller_phone",
    "seller_city",
    "buy_value",
    "buy_date",
    "buyer_id",
    "buyer_name",
    "buyer_phone",
    "buyer_address",
    "sale_value",
    "finance_amount",
    "tenure",
    "sale_date",
];

/// Canonical column names for installment-schedule rows.
pub const INSTALLMENT_FIELDS: &[&str] = &[
    "vehicle_id",
    "buyer_id",
    "emi_no",
    "due_date",
    "paid_date",
    "amount",
    "status",
    "delay_days",
];

// Alias variants observed across snapshot exports. Each canonical name also
// matches itself under normalization, so only extra spellings are listed.
const VEHICLE_ALIASES: &[(&str, &[&str])] = &[
    ("vehicle_id", &["Vehicle Id", "VehicleID", "Veh Id", "Id"]),
    ("type", &["Vehicle Type", "Category"]),
    ("brand", &["Make", "Company"]),
    ("model", &["Vehicle Model"]),
    ("color", &["Colour"]),
    ("number", &["Reg Number", "Registration No", "Vehicle Number", "Reg No"]),
    ("status", &["Vehicle Status", "Stock Status"]),
    ("name", &["Vehicle Name", "Title"]),
    ("seller_name", &["Seller", "Seller Name"]),
    ("seller_phone", &["Seller Mobile", "Seller Contact"]),
    ("seller_city", &["Seller Place", "Seller Town"]),
    ("buy_value", &["Buy Price", "Purchase Value", "Purchase Price"]),
    ("buy_date", &["Purchase Date", "Bought On"]),
    ("buyer_id", &["Buyer Id", "BuyerID"]),
    ("buyer_name", &["Buyer", "Customer Name"]),
    ("buyer_phone", &["Buyer Mobile", "Buyer Contact", "Customer Phone"]),
    ("buyer_address", &["Buyer Addr", "Customer Address"]),
    ("sale_value", &["Sale Price", "Sold Value", "Selling Price"]),
    ("finance_amount", &["Finance Amt", "Loan Amount", "Financed Amount"]),
    ("tenure", &["Tenure Months", "Loan Tenure"]),
    ("sale_date", &["Sold On", "Sold Date", "Date Of Sale"]),
];

const INSTALLMENT_ALIASES: &[(&str, &[&str])] = &[
    ("vehicle_id", &["Vehicle Id", "VehicleID", "Veh Id"]),
    ("buyer_id", &["Buyer Id", "BuyerID", "Customer Id"]),
    ("emi_no", &["EMI No", "EMI Number", "Installment No", "Inst No"]),
    ("due_date", &["Due Date", "EMI Due Date", "Due On"]),
    ("paid_date", &["Paid Date", "Payment Date", "Paid On"]),
    ("amount", &["EMI Amount", "Installment Amount", "EMI Amt"]),
    ("status", &["EMI Status", "Payment Status"]),
    ("delay_days", &["Delay", "Delay Days", "Days Late"]),
];

/// Reduces a header to its lookup key: lowercase with every character that is
/// not a lowercase letter or digit stripped.
pub fn normalize_header_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Maps incoming header spellings to canonical field names for one source kind.
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    by_key: HashMap<String, &'static str>,
}

impl HeaderResolver {
    /// Resolver for the vehicle-inventory source.
    pub fn vehicles() -> Self {
        Self::from_entries(VEHICLE_ALIASES)
    }

    /// Resolver for the installment-schedule source.
    pub fn installments() -> Self {
        Self::from_entries(INSTALLMENT_ALIASES)
    }

    fn from_entries(entries: &'static [(&'static str, &'static [&'static str])]) -> Self {
        let mut by_key = HashMap::new();
        for (canonical, variants) in entries {
            by_key.insert(normalize_header_key(canonical), *canonical);
            for variant in *variants {
                by_key.insert(normalize_header_key(variant), *canonical);
            }
        }
        Self { by_key }
    }

    /// Resolves one header to its canonical name, or passes it through
    /// unchanged when no alias matches.
    pub fn resolve(&self, header: &str) -> String {
        match self.by_key.get(normalize_header_key(header).as_str()) {
            Some(canonical) => (*canonical).to_string(),
            None => header.to_string(),
        }
    }

    pub fn resolve_headers(&self, headers: &[String]) -> Vec<String> {
        headers.iter().map(|h| self.resolve(h)).collect()
    }
}
