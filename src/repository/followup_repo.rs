// ==========================================
// Followup document repository
// ==========================================
// Document store keyed by unique name; whole-document JSON bodies.
// A document is persisted and replaced as a unit - its reports live
// inside the body and are never separately addressable.
// ==========================================

use crate::domain::document::FollowupDocument;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// FollowupDocumentRepository
// ==========================================
pub struct FollowupDocumentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FollowupDocumentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a new document
    ///
    /// # Returns
    /// - `Ok(doc_id)` on success
    /// - `Err(UniqueConstraintViolation)` when the name is taken
    pub fn insert(&self, doc: &FollowupDocument) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let body = serde_json::to_string(doc)?;
        let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();

        conn.execute(
            r#"INSERT INTO followup_document (doc_id, name, body, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
            params![&doc.id, &doc.name, &body, &now, &now],
        )?;

        Ok(doc.id.clone())
    }

    /// Find one document by name
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<FollowupDocument>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            "SELECT body FROM followup_document WHERE name = ?",
            params![name],
            |row| row.get::<_, String>(0),
        ) {
            Ok(body) => Ok(Some(serde_json::from_str(&body)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all documents, newest first
    pub fn find_all(&self) -> RepositoryResult<Vec<FollowupDocument>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT body FROM followup_document ORDER BY created_at DESC",
        )?;
        let bodies = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(RepositoryError::from))
            .collect()
    }

    /// Replace a stored document as a whole
    pub fn replace(&self, doc: &FollowupDocument) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let body = serde_json::to_string(doc)?;
        let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();

        let updated = conn.execute(
            "UPDATE followup_document SET name = ?, body = ?, updated_at = ? WHERE doc_id = ?",
            params![&doc.name, &body, &now, &doc.id],
        )?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "FollowupDocument".to_string(),
                id: doc.id.clone(),
            });
        }
        Ok(())
    }

    /// Delete one document by name (whole-document delete only)
    ///
    /// Also drops the document's report-name index entries.
    pub fn delete_by_name(&self, name: &str) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let doc_id: Option<String> = match tx.query_row(
            "SELECT doc_id FROM followup_document WHERE name = ?",
            params![name],
            |row| row.get(0),
        ) {
            Ok(id) => Some(id),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let Some(doc_id) = doc_id else {
            return Err(RepositoryError::NotFound {
                entity: "FollowupDocument".to_string(),
                id: name.to_string(),
            });
        };

        tx.execute(
            "DELETE FROM report_name_index WHERE doc_id = ?",
            params![&doc_id],
        )?;
        tx.execute(
            "DELETE FROM followup_document WHERE doc_id = ?",
            params![&doc_id],
        )?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }
}
