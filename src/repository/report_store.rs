// ==========================================
// Report store
// ==========================================
// Append-only collection of named snapshots per followup document.
// The in-memory name check runs against the document loaded at
// session start; this is advisory only (a second session may have
// appended in between), so the report_name_index table's UNIQUE
// constraint backstops it at the persistence layer.
// ==========================================

use crate::domain::document::FollowupDocument;
use crate::domain::report::Snapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::info;

// ==========================================
// ReportStore
// ==========================================
pub struct ReportStore {
    conn: Arc<Mutex<Connection>>,
}

impl ReportStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Append a snapshot to a document and persist the whole document
    ///
    /// The index insert and the body update run in one transaction;
    /// on any failure nothing is stored, the name stays free and the
    /// caller's document is left without the report.
    ///
    /// # Errors
    /// - `UniqueConstraintViolation`: the name is taken - either seen
    ///   on the loaded document or caught by the index table when a
    ///   concurrent session got there first
    /// - `NotFound`: the stored document row is gone
    pub fn append(&self, doc: &mut FollowupDocument, snapshot: Snapshot) -> RepositoryResult<()> {
        let name = snapshot.report_name().to_string();
        let kind = snapshot.kind();

        if doc.report_name_exists(&name) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "report name already exists: {}",
                name
            )));
        }

        // Build the post-append state first; the caller's copy is
        // only updated after the commit succeeds.
        let mut updated = doc.clone();
        match snapshot {
            Snapshot::Production(report) => updated.reports.push(report),
            Snapshot::Quality(report) => updated.qrqc_reports.push(report),
        }
        let body = serde_json::to_string(&updated)?;

        {
            let mut conn = self
                .conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            let tx = conn
                .transaction()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
            let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();

            // The UNIQUE(doc_id, report_name) constraint is the
            // storage-level uniqueness check.
            tx.execute(
                r#"INSERT INTO report_name_index (doc_id, report_name, report_kind, created_at)
                   VALUES (?, ?, ?, ?)"#,
                params![&updated.id, &name, &kind.to_string(), &now],
            )?;

            let rows = tx.execute(
                "UPDATE followup_document SET name = ?, body = ?, updated_at = ? WHERE doc_id = ?",
                params![&updated.name, &body, &now, &updated.id],
            )?;
            if rows == 0 {
                // tx rolls back on drop; the index row is discarded
                return Err(RepositoryError::NotFound {
                    entity: "FollowupDocument".to_string(),
                    id: updated.id.clone(),
                });
            }

            tx.commit()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        }

        *doc = updated;
        doc.clear_dirty();

        info!(document = %doc.name, report = %name, kind = %kind, "snapshot appended");
        Ok(())
    }
}
