// ==========================================
// Status reports - frozen snapshots
// ==========================================
// A report is an immutable capture of the running rollups plus the
// reconciled planning figures, keyed by a user-chosen name that is
// unique within its owning document. History is never edited: a
// corrected report is a new snapshot under a new name.
// ==========================================

use crate::domain::planning::PlanningRow;
use crate::domain::types::WorkCenterKind;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// PlanChangeEntry - tagged plan revision
// ==========================================
// Sign convention: quantity and price are negated when the comment
// carries the reduction marker. The tag semantics are a domain
// convention of the planning department; the engine passes them
// through unaltered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanChangeEntry {
    pub comment: String,
    pub quantity: f64,
    pub price: f64,
}

// ==========================================
// DailyBucket - one delivery date's plan/actual pair
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub planned_qty: f64,
    pub finished_qty: f64,
}

// ==========================================
// PlanSummary - reduced planning-master figures
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    pub sample_price: f64,
    pub output_plan_sales: f64,
    pub output_plan_dc: f64,
    pub material_cost: f64,
    pub repack_material_cost: f64,

    // Per-stage quantity sums used by the completion ratios.
    // KFT = pre-finishing stage, repack = finishing stage.
    pub kft_planned_qty: f64,
    pub kft_finished_qty: f64,
    pub repack_planned_qty: f64,
    pub repack_finished_qty: f64,

    pub plan_changes: Vec<PlanChangeEntry>,

    // Daily series bucketed by target delivery date, ascending.
    // Plan buckets carry the pre-finishing stage, actual buckets the
    // finishing stage.
    pub daily_plan_buckets: Vec<DailyBucket>,
    pub daily_actual_buckets: Vec<DailyBucket>,
}

// ==========================================
// WorkCenterSummary - one center's rollup at capture time
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCenterSummary {
    pub work_center: String,
    pub kind: WorkCenterKind,
    pub cumulative_plan: i64,
    pub cumulative_output: i64,
    /// Mean of per-day efficiency among days with efficiency > 0;
    /// 0 when no such day exists
    pub avg_efficiency: f64,
    /// Mean of per-day reject ratio among days with ratio > 0
    pub avg_reject_ratio: f64,
    /// Manual centers only: mean subcontractor productivity among
    /// days with a value > 0
    pub avg_subcontractor_efficiency: f64,
}

// ==========================================
// CompletionRatios - quantity and time-proportional
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletionRatios {
    pub kft_quantity_ratio: f64,
    pub repack_quantity_ratio: f64,
    /// finished / (daily plan rate x workdays elapsed). The production
    /// report floors workdays elapsed at 1; the quality report does
    /// not and the ratio may be non-finite before any headcount entry.
    /// Non-finite values persist as JSON null and read back as NaN.
    #[serde(deserialize_with = "ratio_or_nan")]
    pub kft_time_ratio: f64,
    #[serde(deserialize_with = "ratio_or_nan")]
    pub repack_time_ratio: f64,
}

// serde_json writes non-finite floats as null
fn ratio_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

// ==========================================
// StatusReport - production-meeting snapshot
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub report_name: String,
    pub issued_at: NaiveDateTime,
    pub work_center_summaries: Vec<WorkCenterSummary>,
    pub plan_summary: PlanSummary,
    pub completion: CompletionRatios,
    pub plan_changes: Vec<PlanChangeEntry>,

    // Turnover / shipment reconciliation (production kind only)
    pub actual_turnover_sales: f64,
    pub actual_turnover_dc: f64,
    pub remaining_shipment_sales: f64,
    pub remaining_shipment_dc: f64,
    pub sales_plan: f64,       // turnover + remaining shipments
    pub sales_plan_dc: f64,
    pub dc_movement: f64,      // planned DC - sales plan DC
}

// ==========================================
// StatusReportQrqc - quality-meeting snapshot
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReportQrqc {
    pub report_name: String,
    pub issued_at: NaiveDateTime,
    pub work_center_summaries: Vec<WorkCenterSummary>,
    pub plan_summary: PlanSummary,
    pub completion: CompletionRatios,
    pub plan_changes: Vec<PlanChangeEntry>,
}

// ==========================================
// Snapshot - either report kind
// ==========================================
// The store appends either flavor through one entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Snapshot {
    Production(StatusReport),
    Quality(StatusReportQrqc),
}

impl Snapshot {
    pub fn report_name(&self) -> &str {
        match self {
            Snapshot::Production(r) => &r.report_name,
            Snapshot::Quality(r) => &r.report_name,
        }
    }

    pub fn kind(&self) -> crate::domain::types::ReportKind {
        match self {
            Snapshot::Production(_) => crate::domain::types::ReportKind::Production,
            Snapshot::Quality(_) => crate::domain::types::ReportKind::Quality,
        }
    }
}

/// Input bundle of a snapshot build: fresh external data pulled by
/// the caller right before the capture.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInputs {
    pub plan_rows: Vec<PlanningRow>,
    pub shipment_rows: Option<Vec<crate::domain::planning::ShipmentOpenRow>>,
    pub turnover_rows: Option<Vec<crate::domain::planning::TurnoverRow>>,
}
