// ==========================================
// Document factory
// ==========================================
// Builds a new followup document from a creation request: validates
// the input, computes the workday sequence through the calendar,
// seeds one daily record per workday per selected work center and
// persists the aggregate as a whole.
// ==========================================
// No partial persist: validation happens before any write, and the
// document is stored in a single insert.
// ==========================================

use crate::domain::document::{FollowupDocument, HeadcountRecord};
use crate::domain::record::DailyRecord;
use crate::domain::types::{ShiftConfig, WorkCenterSelection};
use crate::engine::calendar::WorkdayCalendar;
use crate::engine::rollup::RollupCalculator;
use crate::repository::error::RepositoryError;
use crate::repository::FollowupDocumentRepository;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

// ==========================================
// Factory errors
// ==========================================
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("a followup document named '{0}' already exists")]
    DuplicateName(String),

    #[error("finish date {finish} is not after start date {start}")]
    InvalidRange { start: NaiveDate, finish: NaiveDate },

    #[error("no work centers selected")]
    NoWorkCentersSelected,

    #[error("persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

pub type FactoryResult<T> = Result<T, FactoryError>;

// ==========================================
// CreateDocumentRequest
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub name: String,
    pub plan_name: String,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub shift_config: ShiftConfig,
    pub absence_ratio: f64,
    pub selected_work_centers: Vec<WorkCenterSelection>,
    /// Caller-supplied non-standard workdays (e.g. worked Saturdays
    /// specific to this run)
    pub extra_calendar_days: BTreeSet<NaiveDate>,
}

// ==========================================
// DocumentFactory
// ==========================================
pub struct DocumentFactory {
    repo: Arc<FollowupDocumentRepository>,
    calendar: WorkdayCalendar,
    rollup: RollupCalculator,
}

impl DocumentFactory {
    pub fn new(repo: Arc<FollowupDocumentRepository>, calendar: WorkdayCalendar) -> Self {
        Self {
            repo,
            calendar,
            rollup: RollupCalculator::new(),
        }
    }

    /// Create and persist a new followup document
    ///
    /// # Errors
    /// - `DuplicateName`: the store already holds a document by that name
    /// - `InvalidRange`: finish date not after start date
    /// - `NoWorkCentersSelected`: empty selection
    /// - `Persistence`: the single insert failed; nothing was stored
    pub fn create(&self, request: CreateDocumentRequest) -> FactoryResult<FollowupDocument> {
        if request.finish_date <= request.start_date {
            return Err(FactoryError::InvalidRange {
                start: request.start_date,
                finish: request.finish_date,
            });
        }
        if request.selected_work_centers.is_empty() {
            return Err(FactoryError::NoWorkCentersSelected);
        }
        if self.repo.find_by_name(&request.name)?.is_some() {
            return Err(FactoryError::DuplicateName(request.name));
        }

        let workdays = self.calendar.list_workdays(
            request.start_date,
            request.finish_date,
            &request.extra_calendar_days,
        );

        let mut doc = FollowupDocument::new(
            &request.name,
            &request.plan_name,
            request.start_date,
            request.finish_date,
            request.shift_config,
            request.absence_ratio,
        );
        doc.workday_count = workdays.len() as i64;
        doc.headcount = workdays.iter().map(|d| HeadcountRecord::new(*d)).collect();

        // One series per selected center, daily plan held constant
        for selection in &request.selected_work_centers {
            let series: Vec<DailyRecord> = workdays
                .iter()
                .map(|d| DailyRecord::new(*d, selection.kind, selection.daily_plan))
                .collect();
            doc.series_map_mut(selection.kind)
                .insert(selection.work_center.clone(), series);
        }

        self.rollup.rollup_document(&mut doc);
        self.repo.insert(&doc)?;

        info!(
            document = %doc.name,
            plan = %doc.plan_name,
            workdays = doc.workday_count,
            centers = request.selected_work_centers.len(),
            "followup document created"
        );

        Ok(doc)
    }
}
