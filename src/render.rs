//! Terminal and JSON presentation of the derived views.

use analytics::{ChartAggregates, FilterOptions, Measure, RowIssue, ValidationReport};
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::FilterSet;
use serde::Serialize;
use std::path::Path;

/// The JSON document written by `report --format json`.
#[derive(Serialize)]
pub struct ReportEnvelope<'a> {
    pub generated_at: DateTime<Utc>,
    pub dataset: &'a Path,
    pub validation: &'a ValidationReport,
    pub aggregates: &'a ChartAggregates,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(
        dataset: &'a Path,
        validation: &'a ValidationReport,
        aggregates: &'a ChartAggregates,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            dataset,
            validation,
            aggregates,
        }
    }
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn measure(value: &Measure<f64>, format: impl Fn(f64) -> String) -> String {
    match value.value() {
        Some(v) => format(*v),
        None => value.status().to_string(),
    }
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

pub fn validation(report: &ValidationReport) -> String {
    let mut out = format!(
        "{} of {} rows kept, {} dropped\n",
        report.kept_rows, report.total_rows, report.dropped_rows
    );

    if !report.dropped_by_field.is_empty() {
        let mut dropped = table(vec!["Required column", "Rows dropped"]);
        for (column, count) in &report.dropped_by_field {
            dropped.add_row(vec![column.to_string(), count.to_string()]);
        }
        out.push_str(&format!("{dropped}\n"));
    }

    if !report.absent_optional.is_empty() {
        let names: Vec<String> = report.absent_optional.iter().map(|c| c.to_string()).collect();
        out.push_str(&format!("Optional columns absent: {}\n", names.join(", ")));
    }

    if !report.issues.is_empty() {
        out.push_str(&issues(&report.issues));
    }

    out
}

/// One line per row problem, in input order.
pub fn issues(issues: &[RowIssue]) -> String {
    let mut rows = table(vec!["Row", "Column", "Issue", "Value", "Dropped"]);
    for issue in issues {
        rows.add_row(vec![
            issue.row.to_string(),
            issue.column.to_string(),
            issue.kind.to_string(),
            issue.raw.clone(),
            if issue.dropped { "yes" } else { "no" }.to_string(),
        ]);
    }
    rows.to_string()
}

pub fn describe_filters(filters: &FilterSet) -> String {
    let mut parts = Vec::new();
    if let Some(category) = &filters.category {
        parts.push(format!("category = {category}"));
    }
    if let Some(sector) = &filters.sector {
        parts.push(format!("sector = {sector}"));
    }
    if let Some(region) = &filters.region {
        parts.push(format!("region = {region}"));
    }
    if let Some(years) = &filters.years {
        let bound = |year: i32, open: i32| {
            if year == open {
                "..".to_string()
            } else {
                year.to_string()
            }
        };
        parts.push(format!(
            "years {} to {}",
            bound(years.from(), i32::MIN),
            bound(years.to(), i32::MAX)
        ));
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn aggregates(
    aggregates: &ChartAggregates,
    filters: &FilterSet,
    domain_threshold_years: f64,
) -> String {
    let mut out = format!(
        "Active filters: {} ({} of {} records)\n",
        describe_filters(filters),
        aggregates.matched_rows,
        aggregates.total_rows
    );
    if aggregates.is_empty() {
        out.push_str("No data matches the current filters.\n");
        return out;
    }

    let kpis = &aggregates.kpis;
    let mut kpi_table = table(vec!["Indicator", "Value"]);
    kpi_table
        .add_row(vec![
            "Median skill half-life".to_string(),
            measure(&kpis.median_half_life_years, |v| format!("{v:.1} years")),
        ])
        .add_row(vec![
            "Critical skills (<2y)".to_string(),
            measure(&kpis.critical_share, |v| format!("{:.1}%", v * 100.0)),
        ])
        .add_row(vec![
            "Avg reskilling duration".to_string(),
            measure(&kpis.mean_reskilling_months, |v| format!("{v:.0} months")),
        ])
        .add_row(vec![
            "Reskilling viable".to_string(),
            measure(&kpis.reskilling_viable_share, |v| format!("{:.1}%", v * 100.0)),
        ]);
    out.push_str(&format!("{kpi_table}\n"));

    let mut distribution = table(vec![
        "Skill domain",
        "n",
        "Min",
        "Q1",
        "Median",
        "Q3",
        "Max",
        "Mean",
    ]);
    for d in &aggregates.category_distribution {
        let flag = if d.below_domain_threshold { " *" } else { "" };
        distribution.add_row(vec![
            format!("{}{flag}", d.category),
            d.count.to_string(),
            format!("{:.2}", d.min),
            format!("{:.2}", d.q1),
            format!("{:.2}", d.median),
            format!("{:.2}", d.q3),
            format!("{:.2}", d.max),
            format!("{:.2}", d.mean),
        ]);
    }
    out.push_str(&format!(
        "Half-life by domain (* median below {domain_threshold_years} years)\n{distribution}\n"
    ));

    let scatter = &aggregates.adoption_vs_depreciation;
    let trend = match scatter.trend.value() {
        Some(t) => format!(
            "slope {:.4}, intercept {:.4}, R² {:.3}, r {}",
            t.slope,
            t.intercept,
            t.r_squared,
            optional(t.correlation, 3)
        ),
        None => scatter.trend.status().to_string(),
    };
    out.push_str(&format!(
        "AI adoption vs depreciation: {} points, {trend}\n",
        scatter.points.len()
    ));

    let mut urgency = table(vec!["Urgency", "Skills", "Share"]);
    for bucket in &aggregates.urgency {
        urgency.add_row(vec![
            bucket.label.to_string(),
            bucket.count.to_string(),
            format!("{:.1}%", bucket.share * 100.0),
        ]);
    }
    out.push_str(&format!("{urgency}\n"));

    if !aggregates.viability.is_empty() {
        let mut viability = table(vec![
            "Skill domain",
            "Reskilling (months)",
            "Half-life (years)",
            "Viability ratio",
            "Viable",
        ]);
        for v in &aggregates.viability {
            viability.add_row(vec![
                v.category.clone(),
                format!("{:.1}", v.mean_reskilling_months),
                format!("{:.2}", v.mean_half_life_years),
                optional(v.mean_viability_ratio, 2),
                if v.viable { "yes" } else { "no" }.to_string(),
            ]);
        }
        out.push_str(&format!("{viability}\n"));
    }

    if !aggregates.temporal_trend.is_empty() {
        let mut temporal = table(vec!["Year", "n", "Mean", "Median", "Std"]);
        for p in &aggregates.temporal_trend {
            temporal.add_row(vec![
                p.year.to_string(),
                p.count.to_string(),
                format!("{:.2}", p.mean),
                format!("{:.2}", p.median),
                optional(p.std_dev, 2),
            ]);
        }
        out.push_str(&format!("{temporal}\n"));
    }

    if !aggregates.sector_breakdown.is_empty() {
        let mut sectors = table(vec!["Sector", "n", "Mean half-life", "Critical"]);
        for s in &aggregates.sector_breakdown {
            sectors.add_row(vec![
                s.sector.clone(),
                s.count.to_string(),
                format!("{:.2}", s.mean_half_life_years),
                format!("{:.1}%", s.critical_share * 100.0),
            ]);
        }
        out.push_str(&format!("{sectors}\n"));
    }

    if !aggregates.risk_profile.is_empty() {
        out.push_str(&format!("Risk profile: {} points\n", aggregates.risk_profile.len()));
    }

    if !aggregates.disabled_views.is_empty() {
        let names: Vec<String> = aggregates
            .disabled_views
            .iter()
            .map(|v| format!("{v:?}"))
            .collect();
        out.push_str(&format!("Unavailable for this dataset: {}\n", names.join(", ")));
    }

    out
}

pub fn options(options: &FilterOptions) -> String {
    let years = options
        .year_span
        .map_or_else(|| "-".to_string(), |(from, to)| format!("{from}-{to}"));
    let mut out = table(vec!["Filter", "Values"]);
    out.add_row(vec!["Skill category".to_string(), options.categories.join(", ")])
        .add_row(vec!["Sector".to_string(), options.sectors.join(", ")])
        .add_row(vec!["Region".to_string(), options.regions.join(", ")])
        .add_row(vec!["Years".to_string(), years]);
    out.to_string()
}
