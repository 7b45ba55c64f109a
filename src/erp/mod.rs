// ==========================================
// ERP collaborator contract
// ==========================================
// The ERP/ODBC client is an external collaborator consumed through
// this narrow async interface. Fetches may suspend; applying their
// results to the in-memory record set is synchronous and happens
// after the fetch completed, so a failed fetch leaves prior values
// unchanged.
// ==========================================

use crate::domain::planning::{CapacityLedgerRow, PlanningRow, TurnoverRow};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

// ==========================================
// ERP errors
// ==========================================
// The underlying transport message is preserved verbatim so the
// operator sees the ODBC driver's own wording.
#[derive(Error, Debug)]
pub enum ErpError {
    #[error("ERP connection failed: {0}")]
    ConnectionFailed(String),

    #[error("ERP query failed: {0}")]
    QueryFailed(String),

    #[error("ERP returned a malformed row: {0}")]
    MalformedRow(String),
}

pub type ErpResult<T> = Result<T, ErpError>;

// ==========================================
// ErpClient
// ==========================================
#[async_trait]
pub trait ErpClient: Send + Sync {
    /// Planning-master rows of one plan name
    async fn fetch_planning_rows(&self, plan_name: &str) -> ErpResult<Vec<PlanningRow>>;

    /// Capacity-ledger entries of one work center over a date range
    async fn fetch_capacity_ledger(
        &self,
        work_center: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ErpResult<Vec<CapacityLedgerRow>>;

    /// Turnover rows of one year-month ("YYYY-MM")
    async fn fetch_turnover(&self, year_month: &str) -> ErpResult<Vec<TurnoverRow>>;
}
