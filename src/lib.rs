// ==========================================
// Production Followup - core library
// ==========================================
// Tracks daily production performance against plan for multiple
// work-center types over a production run, and freezes the running
// state into named, immutable status-report snapshots.
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - business rules
pub mod engine;

// Importer layer - spreadsheet data
pub mod importer;

// ERP collaborator contract
pub mod erp;

// Notification layer - email composition
pub mod notify;

// Configuration layer
pub mod config;

// Database infrastructure (connection init / unified PRAGMA)
pub mod db;

// Logging
pub mod logging;

// API layer - operation surface
pub mod api;

// ==========================================
// Re-exports of core types
// ==========================================

// Domain types
pub use domain::types::{ProcessFamily, ReportKind, ShiftConfig, WorkCenterKind};

// Domain entities
pub use domain::{
    DailyRecord, FollowupDocument, HeadcountRecord, PlanChangeEntry, PlanningRow,
    ShipmentOpenRow, ShipmentPlanRow, StatusReport, StatusReportQrqc, TurnoverRow,
    WorkCenterSummary,
};

// Engines
pub use engine::{
    DocumentFactory, LedgerImporter, PlanDataAggregator, RollupCalculator, SnapshotBuilder,
    WorkdayCalendar,
};

// API
pub use api::{FollowupApi, ReportApi};

// ==========================================
// Constants
// ==========================================

// System version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Production Followup";

// Database version
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
