// ==========================================
// Domain model layer
// ==========================================
// Entities, value types and record shapes of the followup system.
// Constraint: no data-access logic, no engine logic.
// ==========================================

pub mod document;
pub mod planning;
pub mod record;
pub mod report;
pub mod types;

// Re-export core types
pub use document::{FollowupDocument, HeadcountRecord};
pub use planning::{
    CapacityLedgerRow, OpenTaskRow, PlanningRow, ShipmentOpenRow, ShipmentPlanRow, TurnoverRow,
};
pub use record::{DailyRecord, RecordExtra, SHIFT_SLOTS};
pub use report::{
    CompletionRatios, DailyBucket, PlanChangeEntry, PlanSummary, Snapshot, SnapshotInputs,
    StatusReport, StatusReportQrqc, WorkCenterSummary,
};
pub use types::{ProcessFamily, ReportKind, ShiftConfig, WorkCenterKind, WorkCenterSelection};
