// ==========================================
// Followup API
// ==========================================
// Operation surface for document lifecycle and daily data entry.
// Every record edit goes through here so the rollup is re-run and
// the dirty flag set in one place - no hidden event cascades.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::document::FollowupDocument;
use crate::domain::record::DailyRecord;
use crate::engine::document_factory::{CreateDocumentRequest, DocumentFactory};
use crate::engine::ledger_import::{LedgerApplyStats, LedgerImporter};
use crate::engine::rollup::RollupCalculator;
use crate::erp::ErpClient;
use crate::repository::FollowupDocumentRepository;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

// ==========================================
// FollowupApi
// ==========================================
pub struct FollowupApi {
    repo: Arc<FollowupDocumentRepository>,
    factory: DocumentFactory,
    ledger_importer: LedgerImporter,
    rollup: RollupCalculator,
}

impl FollowupApi {
    pub fn new(repo: Arc<FollowupDocumentRepository>, factory: DocumentFactory) -> Self {
        Self {
            repo,
            factory,
            ledger_importer: LedgerImporter::new(),
            rollup: RollupCalculator::new(),
        }
    }

    // ==========================================
    // Document lifecycle
    // ==========================================

    /// Create a new followup document (validated, then persisted as
    /// a whole)
    pub fn create_followup_document(
        &self,
        request: CreateDocumentRequest,
    ) -> ApiResult<FollowupDocument> {
        Ok(self.factory.create(request)?)
    }

    pub fn list_documents(&self) -> ApiResult<Vec<FollowupDocument>> {
        Ok(self.repo.find_all()?)
    }

    pub fn get_document(&self, name: &str) -> ApiResult<FollowupDocument> {
        self.repo
            .find_by_name(name)?
            .ok_or_else(|| ApiError::NotFound(format!("FollowupDocument {}", name)))
    }

    /// Whole-document delete; piecewise deletion is not supported
    pub fn delete_document(&self, name: &str) -> ApiResult<()> {
        self.repo.delete_by_name(name)?;
        info!(document = name, "followup document deleted");
        Ok(())
    }

    /// Persist the current in-memory state of a document
    pub fn save(&self, doc: &mut FollowupDocument) -> ApiResult<()> {
        self.repo.replace(doc)?;
        doc.clear_dirty();
        Ok(())
    }

    // ==========================================
    // Daily data entry
    // ==========================================

    /// Edit one daily record through its setters, then re-run the
    /// rollup for the whole document
    pub fn edit_record<F>(
        &self,
        doc: &mut FollowupDocument,
        work_center: &str,
        workday: NaiveDate,
        edit: F,
    ) -> ApiResult<()>
    where
        F: FnOnce(&mut DailyRecord),
    {
        let record = doc
            .find_record_mut(work_center, workday)
            .ok_or_else(|| {
                ApiError::NotFound(format!("DailyRecord {} {}", work_center, workday))
            })?;
        edit(record);

        self.rollup.rollup_document(doc);
        doc.mark_dirty();
        Ok(())
    }

    /// Enter one workday's headcount figures
    pub fn enter_headcount(
        &self,
        doc: &mut FollowupDocument,
        workday: NaiveDate,
        planned: i64,
        actual: i64,
    ) -> ApiResult<()> {
        let record = doc
            .headcount
            .iter_mut()
            .find(|h| h.workday == workday)
            .ok_or_else(|| ApiError::NotFound(format!("HeadcountRecord {}", workday)))?;
        record.planned_headcount = planned;
        record.actual_headcount = actual;
        doc.mark_dirty();
        Ok(())
    }

    // ==========================================
    // Structural edits
    // ==========================================

    pub fn insert_workday(&self, doc: &mut FollowupDocument, workday: NaiveDate) {
        doc.insert_workday(workday);
        self.rollup.rollup_document(doc);
    }

    pub fn remove_workday(&self, doc: &mut FollowupDocument, workday: NaiveDate) {
        doc.remove_workday(workday);
        self.rollup.rollup_document(doc);
    }

    // ==========================================
    // ERP import
    // ==========================================

    /// Fetch the capacity ledger of one work center and apply it
    ///
    /// The fetch completes before anything is applied; on fetch
    /// failure the document is left exactly as it was. The applied
    /// document is persisted before returning.
    pub async fn import_capacity_ledger(
        &self,
        doc: &mut FollowupDocument,
        work_center: &str,
        from: NaiveDate,
        to: NaiveDate,
        erp: &dyn ErpClient,
    ) -> ApiResult<LedgerApplyStats> {
        let rows = erp.fetch_capacity_ledger(work_center, from, to).await?;
        let stats = self.ledger_importer.apply(doc, work_center, &rows);
        if stats.applied_rows > 0 {
            self.save(doc)?;
        }
        Ok(stats)
    }

    /// Fetch and apply the capacity ledger of every tracked work
    /// center
    ///
    /// The per-center fetches run concurrently and must all succeed
    /// before anything is applied; one failed fetch leaves the
    /// document untouched.
    pub async fn import_all_capacity_ledgers(
        &self,
        doc: &mut FollowupDocument,
        from: NaiveDate,
        to: NaiveDate,
        erp: &dyn ErpClient,
    ) -> ApiResult<LedgerApplyStats> {
        let centers: Vec<String> = doc.all_series().map(|(wc, _)| wc.clone()).collect();
        let fetches = centers
            .iter()
            .map(|wc| erp.fetch_capacity_ledger(wc, from, to));
        let fetched = futures::future::try_join_all(fetches).await?;

        let mut total = LedgerApplyStats::default();
        for (wc, rows) in centers.iter().zip(fetched) {
            let stats = self.ledger_importer.apply(doc, wc, &rows);
            total.applied_rows += stats.applied_rows;
            total.skipped_unknown_day += stats.skipped_unknown_day;
            total.skipped_unknown_shift += stats.skipped_unknown_shift;
        }
        if total.applied_rows > 0 {
            self.save(doc)?;
        }
        Ok(total)
    }
}
