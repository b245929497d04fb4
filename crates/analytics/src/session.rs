use crate::engine::MetricDeriver;
use crate::error::AnalyticsError;
use crate::report::{ChartAggregates, FilterOptions, KpiSet};
use crate::table::CleanTable;
use crate::validate::ValidationReport;
use core_types::FilterSet;
use loader::RawTable;

/// One loaded dataset and the deriver used to analyse it.
///
/// The table is validated once at construction and never mutated; each call
/// recomputes from it with the filters the caller passes in.
#[derive(Debug, Clone)]
pub struct Session {
    deriver: MetricDeriver,
    table: CleanTable,
    report: ValidationReport,
}

impl Session {
    pub fn load(raw: &RawTable, deriver: MetricDeriver) -> Result<Self, AnalyticsError> {
        let validated = deriver.validate(raw)?;
        tracing::info!(
            kept = validated.report.kept_rows,
            dropped = validated.report.dropped_rows,
            "Session ready."
        );
        Ok(Self {
            deriver,
            table: validated.table,
            report: validated.report,
        })
    }

    pub fn deriver(&self) -> &MetricDeriver {
        &self.deriver
    }

    pub fn table(&self) -> &CleanTable {
        &self.table
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn kpis(&self, filters: &FilterSet) -> KpiSet {
        self.deriver.derive_kpis(&self.table.filter(filters))
    }

    pub fn aggregates(&self, filters: &FilterSet) -> ChartAggregates {
        self.deriver.derive_chart_aggregates(&self.table, filters)
    }

    pub fn options(&self) -> FilterOptions {
        self.deriver.filter_options(&self.table)
    }
}
