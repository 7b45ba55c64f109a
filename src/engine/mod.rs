// ==========================================
// Engine layer
// ==========================================
// Business rules of the followup system: rollups, workday calendar,
// document creation, plan aggregation, snapshot assembly and ledger
// import.
// Constraint: engines hold no SQL; data access goes through the
// injected repositories.
// ==========================================

pub mod calendar;
pub mod document_factory;
pub mod ledger_import;
pub mod plan_aggregator;
pub mod rollup;
pub mod snapshot;

// Re-export core engines
pub use calendar::{WorkdayCalendar, WorkdayCount};
pub use document_factory::{CreateDocumentRequest, DocumentFactory, FactoryError, FactoryResult};
pub use ledger_import::{LedgerApplyStats, LedgerImporter};
pub use plan_aggregator::PlanDataAggregator;
pub use rollup::RollupCalculator;
pub use snapshot::{SnapshotBuilder, SnapshotError, SnapshotResult};
