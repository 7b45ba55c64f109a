// ==========================================
// Snapshot builder
// ==========================================
// Freezes the current rollups of a followup document together with
// fresh planning / shipment / turnover data into one named status
// report. One parameterized pipeline serves both report kinds; the
// two genuine points of difference are explicit kind hooks:
// - the zero-floor on workdays elapsed (production only)
// - the turnover/shipment reconciliation step (production only)
// ==========================================
// The builder never persists; appending is the report store's job.
// ==========================================

use crate::config::ReportingConfig;
use crate::domain::document::FollowupDocument;
use crate::domain::record::DailyRecord;
use crate::domain::report::{
    CompletionRatios, PlanSummary, Snapshot, SnapshotInputs, StatusReport, StatusReportQrqc,
    WorkCenterSummary,
};
use crate::domain::types::{ReportKind, WorkCenterKind};
use crate::engine::plan_aggregator::PlanDataAggregator;
use chrono::Utc;
use thiserror::Error;
use tracing::info;

// ==========================================
// Snapshot errors
// ==========================================
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("report name must not be blank")]
    MissingReportName,

    #[error("report name already exists: {0}")]
    DuplicateReportName(String),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

// ==========================================
// SnapshotBuilder
// ==========================================
pub struct SnapshotBuilder<'a> {
    config: &'a ReportingConfig,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(config: &'a ReportingConfig) -> Self {
        Self { config }
    }

    /// Build one snapshot of the given kind
    ///
    /// # Errors
    /// - `MissingReportName`: blank report name
    /// - `DuplicateReportName`: the name is taken by an existing
    ///   snapshot of either kind on this document
    pub fn build(
        &self,
        doc: &FollowupDocument,
        kind: ReportKind,
        report_name: &str,
        inputs: &SnapshotInputs,
    ) -> SnapshotResult<Snapshot> {
        let name = report_name.trim();
        if name.is_empty() {
            return Err(SnapshotError::MissingReportName);
        }
        if doc.report_name_exists(name) {
            return Err(SnapshotError::DuplicateReportName(name.to_string()));
        }

        let work_center_summaries = Self::summarize_work_centers(doc);
        let plan_summary = PlanDataAggregator::new(self.config).aggregate(&inputs.plan_rows);
        let completion = Self::completion_ratios(doc, kind, &plan_summary);
        let plan_changes = plan_summary.plan_changes.clone();
        let issued_at = Utc::now().naive_utc();

        info!(
            document = %doc.name,
            report = %name,
            kind = %kind,
            centers = work_center_summaries.len(),
            "snapshot built"
        );

        match kind {
            ReportKind::Production => {
                let recon = self.reconcile_sales(&plan_summary, inputs);
                Ok(Snapshot::Production(StatusReport {
                    report_name: name.to_string(),
                    issued_at,
                    work_center_summaries,
                    plan_summary,
                    completion,
                    plan_changes,
                    actual_turnover_sales: recon.turnover_sales,
                    actual_turnover_dc: recon.turnover_dc,
                    remaining_shipment_sales: recon.shipment_sales,
                    remaining_shipment_dc: recon.shipment_dc,
                    sales_plan: recon.sales_plan,
                    sales_plan_dc: recon.sales_plan_dc,
                    dc_movement: recon.dc_movement,
                }))
            }
            ReportKind::Quality => Ok(Snapshot::Quality(StatusReportQrqc {
                report_name: name.to_string(),
                issued_at,
                work_center_summaries,
                plan_summary,
                completion,
                plan_changes,
            })),
        }
    }

    // ==========================================
    // Work-center summaries
    // ==========================================

    fn summarize_work_centers(doc: &FollowupDocument) -> Vec<WorkCenterSummary> {
        let mut summaries = Vec::new();
        for kind in [
            WorkCenterKind::Machine,
            WorkCenterKind::Inspection,
            WorkCenterKind::Manual,
        ] {
            for (work_center, series) in doc.series_map(kind) {
                summaries.push(Self::summarize_series(work_center, kind, series));
            }
        }
        summaries
    }

    fn summarize_series(
        work_center: &str,
        kind: WorkCenterKind,
        series: &[DailyRecord],
    ) -> WorkCenterSummary {
        let last = series.last();
        WorkCenterSummary {
            work_center: work_center.to_string(),
            kind,
            cumulative_plan: last.map(|r| r.cumulative_plan).unwrap_or(0),
            cumulative_output: last.map(|r| r.cumulative_output).unwrap_or(0),
            avg_efficiency: positive_mean(series.iter().map(Self::daily_efficiency)),
            avg_reject_ratio: positive_mean(series.iter().map(|r| r.reject_ratio)),
            avg_subcontractor_efficiency: match kind {
                WorkCenterKind::Manual => {
                    positive_mean(series.iter().map(|r| r.subcontractor_productivity()))
                }
                _ => 0.0,
            },
        }
    }

    /// The per-day efficiency figure of a record, by kind:
    /// machine efficiency, manual own productivity, inspection
    /// utilization.
    fn daily_efficiency(record: &DailyRecord) -> f64 {
        match record.kind() {
            WorkCenterKind::Machine => record.efficiency(),
            WorkCenterKind::Inspection => record.utilization,
            WorkCenterKind::Manual => match &record.extra {
                crate::domain::record::RecordExtra::Manual {
                    own_productivity, ..
                } => *own_productivity,
                _ => 0.0,
            },
        }
    }

    // ==========================================
    // Completion ratios
    // ==========================================

    fn completion_ratios(
        doc: &FollowupDocument,
        kind: ReportKind,
        summary: &PlanSummary,
    ) -> CompletionRatios {
        // Known asymmetry between the two report kinds, kept on
        // purpose: the production report floors workdays elapsed at 1
        // so the ratio is defined before the first headcount entry;
        // the quality report does not and may yield a non-finite
        // value in that window.
        let elapsed = doc.workdays_elapsed();
        let effective_elapsed = match kind {
            ReportKind::Production => elapsed.max(1) as f64,
            ReportKind::Quality => elapsed as f64,
        };

        let scheduled = doc.workday_count as f64;

        CompletionRatios {
            kft_quantity_ratio: quantity_ratio(summary.kft_finished_qty, summary.kft_planned_qty),
            repack_quantity_ratio: quantity_ratio(
                summary.repack_finished_qty,
                summary.repack_planned_qty,
            ),
            kft_time_ratio: time_ratio(
                summary.kft_finished_qty,
                summary.kft_planned_qty,
                scheduled,
                effective_elapsed,
            ),
            repack_time_ratio: time_ratio(
                summary.repack_finished_qty,
                summary.repack_planned_qty,
                scheduled,
                effective_elapsed,
            ),
        }
    }

    // ==========================================
    // Turnover / shipment reconciliation (production hook)
    // ==========================================

    fn reconcile_sales(&self, summary: &PlanSummary, inputs: &SnapshotInputs) -> SalesRecon {
        let mut recon = SalesRecon::default();

        if let Some(turnover) = &inputs.turnover_rows {
            for row in turnover {
                if row.business_area != self.config.business_area {
                    continue;
                }
                if row.item_code == self.config.sample_item_code {
                    continue;
                }
                recon.turnover_sales += row.eur_amount;
                recon.turnover_dc += row.dc_amount;
            }
        }

        if let Some(shipments) = &inputs.shipment_rows {
            for row in shipments {
                recon.shipment_sales += row.open_sales_eur;
                recon.shipment_dc += row.open_dc_eur;
            }
        }

        recon.sales_plan = recon.turnover_sales + recon.shipment_sales;
        recon.sales_plan_dc = recon.turnover_dc + recon.shipment_dc;
        recon.dc_movement = summary.output_plan_dc - recon.sales_plan_dc;
        recon
    }
}

#[derive(Debug, Default)]
struct SalesRecon {
    turnover_sales: f64,
    turnover_dc: f64,
    shipment_sales: f64,
    shipment_dc: f64,
    sales_plan: f64,
    sales_plan_dc: f64,
    dc_movement: f64,
}

/// finished / planned, 0 when nothing is planned
fn quantity_ratio(finished: f64, planned: f64) -> f64 {
    if planned == 0.0 {
        0.0
    } else {
        finished / planned
    }
}

/// finished / (daily plan rate x workdays elapsed)
///
/// The quality report may pass effective_elapsed = 0; the resulting
/// non-finite value is the documented behavior of that kind, not an
/// error.
fn time_ratio(finished: f64, planned: f64, scheduled_workdays: f64, effective_elapsed: f64) -> f64 {
    if scheduled_workdays == 0.0 || planned == 0.0 {
        return 0.0;
    }
    let daily_plan_rate = planned / scheduled_workdays;
    finished / (daily_plan_rate * effective_elapsed)
}

/// Mean of the strictly positive values of an iterator; 0 if none
fn positive_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if v > 0.0 {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_mean_skips_zero_days() {
        let mean = positive_mean(vec![0.0, 0.8, 0.0, 0.6].into_iter());
        assert!((mean - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_positive_mean_empty_is_zero() {
        assert_eq!(positive_mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_quantity_ratio_zero_plan() {
        assert_eq!(quantity_ratio(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_time_ratio_with_floor_is_finite() {
        // Production kind passes elapsed floored at 1
        let ratio = time_ratio(50.0, 1000.0, 20.0, 1.0);
        assert!(ratio.is_finite());
        assert!((ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_ratio_without_floor_may_be_non_finite() {
        // Quality kind passes the raw elapsed count
        let ratio = time_ratio(50.0, 1000.0, 20.0, 0.0);
        assert!(!ratio.is_finite());
    }
}
