// ==========================================
// Rollup calculator
// ==========================================
// Walks one entity's daily records in workday order and recomputes
// the running cumulative plan/output series.
// ==========================================
// Contract: sorts defensively by workday before computing - callers
// are not required to pre-sort (the implicit-order contract was a
// known bug class). Idempotent: re-running on unchanged input yields
// an identical series.
// ==========================================

use crate::domain::document::FollowupDocument;
use crate::domain::record::DailyRecord;
use tracing::debug;

// ==========================================
// RollupCalculator
// ==========================================
// Stateless engine; seeds are passed per call.
pub struct RollupCalculator;

impl RollupCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Recompute the cumulative series of one entity
    ///
    /// Sorts by workday ascending, then a single left-to-right pass:
    /// cumulative_plan[i]   = cumulative_plan[i-1] + daily_plan[i]
    /// cumulative_output[i] = cumulative_output[i-1] + total_output[i]
    /// starting from 0.
    pub fn rollup(&self, records: &mut Vec<DailyRecord>) {
        self.rollup_seeded(records, 0, 0);
    }

    /// Recompute with explicit carry-in values
    ///
    /// Used when a run continues a prior period's counters.
    pub fn rollup_seeded(&self, records: &mut Vec<DailyRecord>, plan_seed: i64, output_seed: i64) {
        records.sort_by_key(|r| r.workday);

        let mut running_plan = plan_seed;
        let mut running_output = output_seed;
        for record in records.iter_mut() {
            // Local derived fields first, so the pass never reads a
            // stale total_output
            record.recompute_derived();

            running_plan += record.daily_plan;
            running_output += record.total_output;
            record.cumulative_plan = running_plan;
            record.cumulative_output = running_output;
        }
    }

    /// Recompute every series of a document, headcount excluded
    /// (headcount carries no cumulative fields)
    pub fn rollup_document(&self, doc: &mut FollowupDocument) {
        let mut series_count = 0usize;
        for (_, series) in doc.all_series_mut() {
            series_count += 1;
            Self::rollup_series(series);
        }
        debug!(document = %doc.name, series_count, "rollup recomputed");
    }

    fn rollup_series(records: &mut Vec<DailyRecord>) {
        records.sort_by_key(|r| r.workday);
        let mut running_plan = 0i64;
        let mut running_output = 0i64;
        for record in records.iter_mut() {
            record.recompute_derived();
            running_plan += record.daily_plan;
            running_output += record.total_output;
            record.cumulative_plan = running_plan;
            record.cumulative_output = running_output;
        }
    }
}

impl Default for RollupCalculator {
    fn default() -> Self {
        Self::new()
    }
}
