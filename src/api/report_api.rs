// ==========================================
// Report API
// ==========================================
// Builds and appends status-report snapshots. The uniqueness check
// before building is advisory (names loaded at session start); the
// report store's index table backstops it at write time.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ReportingConfig;
use crate::domain::document::FollowupDocument;
use crate::domain::report::{PlanSummary, Snapshot, SnapshotInputs};
use crate::domain::types::ReportKind;
use crate::engine::plan_aggregator::PlanDataAggregator;
use crate::engine::snapshot::SnapshotBuilder;
use crate::erp::ErpClient;
use crate::repository::error::RepositoryError;
use crate::repository::ReportStore;
use std::sync::Arc;

// ==========================================
// ReportApi
// ==========================================
pub struct ReportApi {
    store: Arc<ReportStore>,
    config: ReportingConfig,
}

impl ReportApi {
    pub fn new(store: Arc<ReportStore>, config: ReportingConfig) -> Self {
        Self { store, config }
    }

    /// Aggregate planning rows into the summary figures
    pub fn build_plan_summary(
        &self,
        rows: &[crate::domain::planning::PlanningRow],
    ) -> PlanSummary {
        PlanDataAggregator::new(&self.config).aggregate(rows)
    }

    /// Fetch the snapshot input bundle from the ERP
    ///
    /// Turnover is only pulled for the production report kind (the
    /// quality report carries no financial reconciliation).
    pub async fn fetch_snapshot_inputs(
        &self,
        erp: &dyn ErpClient,
        plan_name: &str,
        kind: ReportKind,
        turnover_year_month: &str,
        shipment_rows: Option<Vec<crate::domain::planning::ShipmentOpenRow>>,
    ) -> ApiResult<SnapshotInputs> {
        let plan_rows = erp.fetch_planning_rows(plan_name).await?;
        let turnover_rows = match kind {
            ReportKind::Production => Some(erp.fetch_turnover(turnover_year_month).await?),
            ReportKind::Quality => None,
        };
        Ok(SnapshotInputs {
            plan_rows,
            shipment_rows,
            turnover_rows,
        })
    }

    /// Build a snapshot and append it to the document's report list
    ///
    /// Returns the appended snapshot. On any failure the document's
    /// existing reports are unchanged.
    pub fn create_status_report(
        &self,
        doc: &mut FollowupDocument,
        kind: ReportKind,
        report_name: &str,
        inputs: &SnapshotInputs,
    ) -> ApiResult<Snapshot> {
        let builder = SnapshotBuilder::new(&self.config);
        let snapshot = builder.build(doc, kind, report_name, inputs)?;

        self.store
            .append(doc, snapshot.clone())
            .map_err(|e| match e {
                // A concurrent session may have taken the name between
                // the advisory check and the write
                RepositoryError::UniqueConstraintViolation(_) => {
                    ApiError::DuplicateReportName(report_name.trim().to_string())
                }
                other => other.into(),
            })?;

        Ok(snapshot)
    }
}
