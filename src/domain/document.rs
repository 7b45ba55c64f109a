// ==========================================
// Followup document - aggregate root
// ==========================================
// Owns, per tracked entity (work center or headcount pool), the
// ordered list of daily records for one production run, plus every
// status report frozen from it. Persisted as a whole; reports are not
// separately addressable.
// ==========================================
// Constraint: the document holds no data-access logic. Cumulative
// fields are recomputed by engine::rollup after any structural or
// plan/output edit; the api layer pairs every edit with a rollup.
// ==========================================

use crate::domain::record::DailyRecord;
use crate::domain::report::{StatusReport, StatusReportQrqc};
use crate::domain::types::{ShiftConfig, WorkCenterKind};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// HeadcountRecord - one workday of the headcount pool
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadcountRecord {
    pub workday: NaiveDate,
    pub planned_headcount: i64,
    pub actual_headcount: i64,
}

impl HeadcountRecord {
    pub fn new(workday: NaiveDate) -> Self {
        Self {
            workday,
            planned_headcount: 0,
            actual_headcount: 0,
        }
    }
}

// ==========================================
// FollowupDocument
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowupDocument {
    pub id: String,                    // document id (uuid)
    pub name: String,                  // unique across the store
    pub plan_name: String,             // ERP plan this run tracks
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub workday_count: i64,            // scheduled workdays of the run
    pub shift_config: ShiftConfig,     // shifts per process family
    pub absence_ratio: f64,            // planned staff absence ratio

    // Owned record collections, series keyed by work-center id
    pub headcount: Vec<HeadcountRecord>,
    pub machine_centers: BTreeMap<String, Vec<DailyRecord>>,
    pub inspection_centers: BTreeMap<String, Vec<DailyRecord>>,
    pub manual_centers: BTreeMap<String, Vec<DailyRecord>>,

    // Frozen snapshots, append-only
    pub reports: Vec<StatusReport>,
    pub qrqc_reports: Vec<StatusReportQrqc>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,

    // Unsaved-changes marker for UI / save logic; not persisted
    #[serde(skip)]
    dirty: bool,
}

impl FollowupDocument {
    /// Create an empty document shell; the factory fills in the
    /// record collections afterwards
    pub fn new(
        name: &str,
        plan_name: &str,
        start_date: NaiveDate,
        finish_date: NaiveDate,
        shift_config: ShiftConfig,
        absence_ratio: f64,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            plan_name: plan_name.to_string(),
            start_date,
            finish_date,
            workday_count: 0,
            shift_config,
            absence_ratio,
            headcount: Vec::new(),
            machine_centers: BTreeMap::new(),
            inspection_centers: BTreeMap::new(),
            manual_centers: BTreeMap::new(),
            reports: Vec::new(),
            qrqc_reports: Vec::new(),
            created_at: now,
            updated_at: now,
            dirty: false,
        }
    }

    // ==========================================
    // Dirty tracking
    // ==========================================

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ==========================================
    // Series access
    // ==========================================

    pub fn series_map(&self, kind: WorkCenterKind) -> &BTreeMap<String, Vec<DailyRecord>> {
        match kind {
            WorkCenterKind::Machine => &self.machine_centers,
            WorkCenterKind::Inspection => &self.inspection_centers,
            WorkCenterKind::Manual => &self.manual_centers,
        }
    }

    pub fn series_map_mut(
        &mut self,
        kind: WorkCenterKind,
    ) -> &mut BTreeMap<String, Vec<DailyRecord>> {
        match kind {
            WorkCenterKind::Machine => &mut self.machine_centers,
            WorkCenterKind::Inspection => &mut self.inspection_centers,
            WorkCenterKind::Manual => &mut self.manual_centers,
        }
    }

    /// Iterate every work-center series, all kinds
    pub fn all_series(&self) -> impl Iterator<Item = (&String, &Vec<DailyRecord>)> {
        self.machine_centers
            .iter()
            .chain(self.inspection_centers.iter())
            .chain(self.manual_centers.iter())
    }

    /// Iterate every work-center series mutably, all kinds
    pub fn all_series_mut(&mut self) -> impl Iterator<Item = (&String, &mut Vec<DailyRecord>)> {
        self.machine_centers
            .iter_mut()
            .chain(self.inspection_centers.iter_mut())
            .chain(self.manual_centers.iter_mut())
    }

    /// Find one series across all kinds
    pub fn find_series_mut(&mut self, work_center: &str) -> Option<&mut Vec<DailyRecord>> {
        if let Some(s) = self.machine_centers.get_mut(work_center) {
            return Some(s);
        }
        if let Some(s) = self.inspection_centers.get_mut(work_center) {
            return Some(s);
        }
        self.manual_centers.get_mut(work_center)
    }

    /// Find one record by work center and workday
    pub fn find_record_mut(
        &mut self,
        work_center: &str,
        workday: NaiveDate,
    ) -> Option<&mut DailyRecord> {
        self.find_series_mut(work_center)?
            .iter_mut()
            .find(|r| r.workday == workday)
    }

    // ==========================================
    // Structural edits
    // ==========================================
    // Both operations touch every series and the headcount pool; the
    // caller re-runs the rollup afterwards (full recompute, no
    // incremental shortcut).

    /// Insert a workday into every series and the headcount pool
    ///
    /// The new record's daily_plan is carried over from the closest
    /// earlier day of the same series (the run plans a constant daily
    /// rate); the first day of a series starts from 0. Duplicate days
    /// are ignored per series.
    pub fn insert_workday(&mut self, workday: NaiveDate) {
        // The owning map decides the record kind; an emptied series
        // must re-seed with its own shape
        for kind in [
            WorkCenterKind::Machine,
            WorkCenterKind::Inspection,
            WorkCenterKind::Manual,
        ] {
            for series in self.series_map_mut(kind).values_mut() {
                if series.iter().any(|r| r.workday == workday) {
                    continue;
                }
                let plan = series
                    .iter()
                    .filter(|r| r.workday < workday)
                    .max_by_key(|r| r.workday)
                    .map(|r| r.daily_plan)
                    .unwrap_or(0);
                let pos = series.partition_point(|r| r.workday < workday);
                series.insert(pos, DailyRecord::new(workday, kind, plan));
            }
        }

        if !self.headcount.iter().any(|h| h.workday == workday) {
            let pos = self.headcount.partition_point(|h| h.workday < workday);
            self.headcount.insert(pos, HeadcountRecord::new(workday));
        }

        self.workday_count = self.headcount.len() as i64;
        self.mark_dirty();
    }

    /// Remove a workday from every series and the headcount pool
    pub fn remove_workday(&mut self, workday: NaiveDate) {
        for (_, series) in self.all_series_mut() {
            series.retain(|r| r.workday != workday);
        }
        self.headcount.retain(|h| h.workday != workday);
        self.workday_count = self.headcount.len() as i64;
        self.mark_dirty();
    }

    // ==========================================
    // Report bookkeeping
    // ==========================================

    /// Check a candidate report name against snapshots of either kind
    pub fn report_name_exists(&self, name: &str) -> bool {
        self.reports.iter().any(|r| r.report_name == name)
            || self.qrqc_reports.iter().any(|r| r.report_name == name)
    }

    /// Count of workdays with actual headcount entered so far
    pub fn workdays_elapsed(&self) -> i64 {
        self.headcount
            .iter()
            .filter(|h| h.actual_headcount > 0)
            .count() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn empty_doc() -> FollowupDocument {
        FollowupDocument {
            id: "D1".to_string(),
            name: "RUN-2024-03".to_string(),
            plan_name: "PLAN-A".to_string(),
            start_date: day(1),
            finish_date: day(29),
            workday_count: 0,
            shift_config: ShiftConfig::default(),
            absence_ratio: 0.05,
            headcount: Vec::new(),
            machine_centers: BTreeMap::new(),
            inspection_centers: BTreeMap::new(),
            manual_centers: BTreeMap::new(),
            reports: Vec::new(),
            qrqc_reports: Vec::new(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            dirty: false,
        }
    }

    #[test]
    fn test_insert_workday_carries_previous_plan() {
        let mut doc = empty_doc();
        doc.machine_centers.insert(
            "M-301".to_string(),
            vec![
                DailyRecord::new(day(4), WorkCenterKind::Machine, 120),
                DailyRecord::new(day(6), WorkCenterKind::Machine, 120),
            ],
        );

        doc.insert_workday(day(5));

        let series = &doc.machine_centers["M-301"];
        assert_eq!(series.len(), 3);
        assert_eq!(series[1].workday, day(5));
        assert_eq!(series[1].daily_plan, 120);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_insert_workday_is_idempotent_per_day() {
        let mut doc = empty_doc();
        doc.manual_centers.insert(
            "A-12".to_string(),
            vec![DailyRecord::new(day(4), WorkCenterKind::Manual, 80)],
        );

        doc.insert_workday(day(5));
        doc.insert_workday(day(5));

        assert_eq!(doc.manual_centers["A-12"].len(), 2);
        assert_eq!(doc.headcount.len(), 1);
    }

    #[test]
    fn test_insert_workday_reseeds_emptied_series_with_its_kind() {
        let mut doc = empty_doc();
        doc.manual_centers.insert(
            "A-12".to_string(),
            vec![DailyRecord::new(day(4), WorkCenterKind::Manual, 80)],
        );
        doc.inspection_centers.insert(
            "Q-1".to_string(),
            vec![DailyRecord::new(day(4), WorkCenterKind::Inspection, 100)],
        );

        // Every workday removed, then one inserted back
        doc.remove_workday(day(4));
        doc.insert_workday(day(5));

        assert_eq!(doc.manual_centers["A-12"][0].kind(), WorkCenterKind::Manual);
        assert_eq!(
            doc.inspection_centers["Q-1"][0].kind(),
            WorkCenterKind::Inspection
        );
    }

    #[test]
    fn test_remove_workday_touches_all_series() {
        let mut doc = empty_doc();
        doc.machine_centers.insert(
            "M-301".to_string(),
            vec![DailyRecord::new(day(4), WorkCenterKind::Machine, 100)],
        );
        doc.inspection_centers.insert(
            "Q-1".to_string(),
            vec![DailyRecord::new(day(4), WorkCenterKind::Inspection, 100)],
        );
        doc.headcount.push(HeadcountRecord::new(day(4)));

        doc.remove_workday(day(4));

        assert!(doc.machine_centers["M-301"].is_empty());
        assert!(doc.inspection_centers["Q-1"].is_empty());
        assert!(doc.headcount.is_empty());
        assert_eq!(doc.workday_count, 0);
    }

    #[test]
    fn test_workdays_elapsed_counts_entered_headcount() {
        let mut doc = empty_doc();
        for d in 4..=8 {
            doc.headcount.push(HeadcountRecord::new(day(d)));
        }
        doc.headcount[0].actual_headcount = 14;
        doc.headcount[1].actual_headcount = 15;

        assert_eq!(doc.workdays_elapsed(), 2);
    }
}
