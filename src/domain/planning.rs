// ==========================================
// External planning / logistics row shapes
// ==========================================
// Row types supplied by the ERP collaborator and the shipment-plan
// spreadsheet. The engine never fetches these itself; they arrive
// through the erp / importer layers.
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PlanningRow - one planning-master row
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningRow {
    pub item_code: String,
    pub planned_qty: f64,
    pub finished_qty: f64,
    pub unit_price: f64,
    pub price_of_planned: f64,     // unit price x planned qty
    pub dc_price_of_planned: f64,  // DC price x planned qty
    pub rm_cost_planned: f64,      // raw-material cost of the planned qty
    pub comment: String,           // free text; may carry a revision tag
    pub is_sample: bool,           // sample row, excluded from sales figures
    pub is_finished_stage: bool,   // finishing (repack) stage row
    pub delivery_date: Option<NaiveDate>, // target delivery date
}

// ==========================================
// CapacityLedgerRow - one ERP capacity-ledger entry
// ==========================================
// Daily actuals per work center, one row per shift posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityLedgerRow {
    pub work_center: String,
    pub posting_date: NaiveDate,
    pub shift_code: String,        // "1" / "2" / "3"
    pub output_qty: i64,
    pub scrap_qty: i64,
    pub scrap_reason_code: Option<String>,
    pub run_time_hours: f64,
    pub performance: f64,          // machine efficiency figure
}

// ==========================================
// TurnoverRow - one invoiced-sales row
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverRow {
    pub item_code: String,
    pub business_area: String,
    pub eur_amount: f64,           // invoiced sales value
    pub dc_amount: f64,            // DC price x invoiced qty
}

// ==========================================
// ShipmentPlanRow - fixed 15-column spreadsheet layout
// ==========================================
// Column order is the contract with logistics; see importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentPlanRow {
    pub document_no: String,
    pub item: String,
    pub open_qty: f64,
    pub requested_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub customer_name: String,
    pub so_number: String,
    pub po_number: String,
    pub unit_price: f64,
    pub open_amount: f64,
    pub order_date: Option<NaiveDate>,
    pub billing_customer_no: String,
    pub customer_no: String,
    pub customer_reference: String,
    pub etd: Option<NaiveDate>,
}

// ==========================================
// ShipmentOpenRow - reconciliation shape
// ==========================================
// Remaining undelivered sales and their cost-standard equivalent,
// the form the snapshot builder consumes. The DC unit price is not
// part of the spreadsheet layout; the caller supplies it per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentOpenRow {
    pub item: String,
    pub open_qty: f64,
    pub open_sales_eur: f64,
    pub open_dc_eur: f64,
}

impl ShipmentOpenRow {
    /// Derive the reconciliation row from a shipment-plan row
    pub fn from_plan_row(row: &ShipmentPlanRow, dc_unit_price: f64) -> Self {
        Self {
            item: row.item.clone(),
            open_qty: row.open_qty,
            open_sales_eur: row.open_amount,
            open_dc_eur: row.open_qty * dc_unit_price,
        }
    }
}

// ==========================================
// OpenTaskRow - notification shape
// ==========================================
// Row of the open-task email table (overdue / upcoming shipments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTaskRow {
    pub item: String,
    pub customer_name: String,
    pub open_qty: f64,
    pub requested_date: Option<NaiveDate>,
    pub note: String,
}

impl OpenTaskRow {
    /// Build the open-task list entry of one shipment-plan row
    pub fn from_shipment(row: &ShipmentPlanRow, note: &str) -> Self {
        Self {
            item: row.item.clone(),
            customer_name: row.customer_name.clone(),
            open_qty: row.open_qty,
            requested_date: row.requested_date,
            note: note.to_string(),
        }
    }
}
