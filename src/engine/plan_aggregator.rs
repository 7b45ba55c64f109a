// ==========================================
// Plan data aggregator
// ==========================================
// Reduces a flat list of planning-master rows into the summary
// figures of a status report: sample price, planned sales / DC
// values, material cost, plan-change entries and daily-bucketed
// plan/actual series.
// ==========================================
// Pure reductions over filtered subsets; no state, no I/O.
// ==========================================

use crate::config::ReportingConfig;
use crate::domain::planning::PlanningRow;
use crate::domain::report::{DailyBucket, PlanChangeEntry, PlanSummary};
use std::collections::BTreeMap;

// ==========================================
// PlanDataAggregator
// ==========================================
pub struct PlanDataAggregator<'a> {
    config: &'a ReportingConfig,
}

impl<'a> PlanDataAggregator<'a> {
    pub fn new(config: &'a ReportingConfig) -> Self {
        Self { config }
    }

    /// Reduce the planning rows of one plan into a summary
    pub fn aggregate(&self, rows: &[PlanningRow]) -> PlanSummary {
        let mut summary = PlanSummary::default();

        for row in rows {
            if row.is_sample {
                summary.sample_price += row.price_of_planned;
                continue;
            }

            summary.output_plan_sales += row.price_of_planned;
            summary.output_plan_dc += row.dc_price_of_planned;
            summary.material_cost += row.rm_cost_planned;

            if row.is_finished_stage {
                summary.repack_material_cost += row.rm_cost_planned;
                summary.repack_planned_qty += row.planned_qty;
                summary.repack_finished_qty += row.finished_qty;
            } else {
                summary.kft_planned_qty += row.planned_qty;
                summary.kft_finished_qty += row.finished_qty;
            }
        }

        summary.plan_changes = self.collect_plan_changes(rows);
        summary.daily_plan_buckets = Self::bucket_by_date(rows, false);
        summary.daily_actual_buckets = Self::bucket_by_date(rows, true);

        summary
    }

    /// Collect the tagged plan-revision rows
    ///
    /// A row is a plan change when its comment starts with the
    /// revision tag character. Quantity and price are negated when
    /// the comment also contains the reduction marker. The tag
    /// semantics are the planning department's convention; nested or
    /// odd tag combinations pass through exactly as tagged.
    pub fn collect_plan_changes(&self, rows: &[PlanningRow]) -> Vec<PlanChangeEntry> {
        let tag = self.config.revision_tag;
        let marker = self.config.reduction_marker;

        rows.iter()
            .filter(|row| row.comment.starts_with(tag))
            .map(|row| {
                let sign = if row.comment.contains(marker) { -1.0 } else { 1.0 };
                PlanChangeEntry {
                    comment: row.comment.clone(),
                    quantity: sign * row.planned_qty,
                    price: sign * row.price_of_planned,
                }
            })
            .collect()
    }

    /// Group rows of one stage by target delivery date (date-only),
    /// one (planned, finished) pair per distinct date, ascending.
    /// Rows without a delivery date and sample rows are skipped.
    fn bucket_by_date(rows: &[PlanningRow], finished_stage: bool) -> Vec<DailyBucket> {
        let mut buckets: BTreeMap<chrono::NaiveDate, (f64, f64)> = BTreeMap::new();

        for row in rows {
            if row.is_sample || row.is_finished_stage != finished_stage {
                continue;
            }
            let Some(date) = row.delivery_date else {
                continue;
            };
            let entry = buckets.entry(date).or_insert((0.0, 0.0));
            entry.0 += row.planned_qty;
            entry.1 += row.finished_qty;
        }

        buckets
            .into_iter()
            .map(|(date, (planned_qty, finished_qty))| DailyBucket {
                date,
                planned_qty,
                finished_qty,
            })
            .collect()
    }
}
