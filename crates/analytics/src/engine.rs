use crate::error::AnalyticsError;
use crate::measure::Measure;
use crate::report::{
    AdoptionPoint, AdoptionVsDepreciation, CategoryDistribution, CategoryViability, ChartAggregates,
    ChartView, FilterOptions, KpiSet, RiskPoint, SectorSummary, UrgencyBucket, YearPoint,
};
use crate::stats;
use crate::table::CleanTable;
use crate::validate::{self, ValidatedTable};
use core_types::{Column, FilterSet, SkillRecord, UrgencyBand};
use loader::RawTable;
use std::collections::{BTreeMap, BTreeSet};

/// Median half-life below which a skill domain is flagged on the distribution view.
pub const DEFAULT_DOMAIN_THRESHOLD_YEARS: f64 = 5.0;

/// A stateless calculator that turns the loaded dataset into KPIs and chart views.
///
/// Every method is a pure function of its arguments; the same table and
/// filters always produce the same output.
#[derive(Debug, Clone)]
pub struct MetricDeriver {
    domain_threshold_years: f64,
}

impl Default for MetricDeriver {
    fn default() -> Self {
        Self {
            domain_threshold_years: DEFAULT_DOMAIN_THRESHOLD_YEARS,
        }
    }
}

impl MetricDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain_threshold(domain_threshold_years: f64) -> Self {
        Self {
            domain_threshold_years,
        }
    }

    pub fn domain_threshold_years(&self) -> f64 {
        self.domain_threshold_years
    }

    /// Resolves the schema and cleans every row of `raw`.
    ///
    /// # Returns
    ///
    /// The cleaned table and its `ValidationReport`, or `AnalyticsError::Schema`
    /// when a required column is missing, or `AnalyticsError::Data` when no row
    /// survives cleaning.
    pub fn validate(&self, raw: &RawTable) -> Result<ValidatedTable, AnalyticsError> {
        validate::validate(raw)
    }

    /// Computes the headline indicators over every row of `table`.
    pub fn derive_kpis(&self, table: &CleanTable) -> KpiSet {
        let records = table.records();
        if records.is_empty() {
            return KpiSet::empty();
        }

        let half_lives: Vec<f64> = records.iter().map(|r| r.obsolescence_years).collect();
        let critical = records.iter().filter(|r| r.is_critical()).count();
        let reskilling: Vec<f64> = records
            .iter()
            .filter_map(|r| r.reskilling_months)
            .map(f64::from)
            .collect();
        let payoffs: Vec<bool> = records
            .iter()
            .filter_map(SkillRecord::has_positive_payoff)
            .collect();
        let viable = payoffs.iter().filter(|p| **p).count();

        KpiSet {
            records: records.len(),
            median_half_life_years: stats::median(&half_lives)
                .map_or(Measure::NoData, Measure::Value),
            critical_share: Measure::ratio(critical, records.len()),
            mean_reskilling_months: stats::mean(&reskilling)
                .map_or(Measure::NotApplicable, Measure::Value),
            reskilling_viable_share: Measure::ratio(viable, payoffs.len()),
        }
    }

    /// Computes every chart view from the rows of `table` that pass `filters`.
    ///
    /// Never fails: an empty selection yields empty views and sentinel KPIs.
    #[tracing::instrument(name = "derive_chart_aggregates", skip_all, fields(total = table.len()))]
    pub fn derive_chart_aggregates(
        &self,
        table: &CleanTable,
        filters: &FilterSet,
    ) -> ChartAggregates {
        let filtered = table.filter(filters);
        let records = filtered.records();
        let disabled_views = Self::disabled_views(table);
        let enabled = |view: ChartView| !disabled_views.contains(&view);

        let viability = if enabled(ChartView::Viability) {
            Self::viability_by_category(records)
        } else {
            Vec::new()
        };
        let temporal_trend = if enabled(ChartView::TemporalTrend) {
            Self::temporal_trend(records)
        } else {
            Vec::new()
        };
        let risk_profile = if enabled(ChartView::RiskProfile) {
            Self::risk_profile(records)
        } else {
            Vec::new()
        };
        let sector_breakdown = if enabled(ChartView::SectorBreakdown) {
            Self::sector_breakdown(records)
        } else {
            Vec::new()
        };

        tracing::debug!(
            matched = records.len(),
            disabled = ?disabled_views,
            "Derived chart aggregates."
        );

        ChartAggregates {
            filters: filters.clone(),
            total_rows: table.len(),
            matched_rows: records.len(),
            kpis: self.derive_kpis(&filtered),
            category_distribution: self.category_distribution(records),
            adoption_vs_depreciation: Self::adoption_vs_depreciation(records),
            urgency: Self::urgency_buckets(records),
            viability,
            temporal_trend,
            risk_profile,
            sector_breakdown,
            disabled_views,
        }
    }

    /// Lists the distinct values the UI can filter on.
    pub fn filter_options(&self, table: &CleanTable) -> FilterOptions {
        let mut categories = BTreeSet::new();
        let mut sectors = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut year_span: Option<(i32, i32)> = None;

        for record in table.records() {
            categories.insert(record.skill_category.clone());
            if let Some(sector) = &record.sector {
                sectors.insert(sector.clone());
            }
            if let Some(region) = &record.region {
                regions.insert(region.clone());
            }
            if let Some(year) = record.year {
                year_span = Some(match year_span {
                    Some((lo, hi)) => (lo.min(year), hi.max(year)),
                    None => (year, year),
                });
            }
        }

        FilterOptions {
            categories: categories.into_iter().collect(),
            sectors: sectors.into_iter().collect(),
            regions: regions.into_iter().collect(),
            year_span,
        }
    }

    /// Views that depend solely on an optional column the dataset lacks.
    fn disabled_views(table: &CleanTable) -> Vec<ChartView> {
        let mut disabled = Vec::new();
        if !table.has(Column::ReskillingMonths) {
            disabled.push(ChartView::Viability);
        }
        if !table.has(Column::Year) {
            disabled.push(ChartView::TemporalTrend);
        }
        if !table.has(Column::ReskillingMonths) {
            disabled.push(ChartView::RiskProfile);
        }
        if !table.has(Column::Sector) {
            disabled.push(ChartView::SectorBreakdown);
        }
        disabled
    }

    fn category_distribution(&self, records: &[SkillRecord]) -> Vec<CategoryDistribution> {
        group_by(records, |r| Some(r.skill_category.as_str()))
            .into_iter()
            .filter_map(|(category, group)| {
                let raw: Vec<f64> = group.iter().map(|r| r.obsolescence_years).collect();
                let values = stats::sorted(&raw);
                let median = stats::median(&values)?;
                Some(CategoryDistribution {
                    category: category.to_string(),
                    count: values.len(),
                    min: *values.first()?,
                    q1: stats::quantile_sorted(&values, 0.25)?,
                    median,
                    q3: stats::quantile_sorted(&values, 0.75)?,
                    max: *values.last()?,
                    mean: stats::mean(&raw)?,
                    below_domain_threshold: median < self.domain_threshold_years,
                    values,
                })
            })
            .collect()
    }

    fn adoption_vs_depreciation(records: &[SkillRecord]) -> AdoptionVsDepreciation {
        if records.is_empty() {
            return AdoptionVsDepreciation::empty();
        }

        let points: Vec<AdoptionPoint> = records
            .iter()
            .map(|r| AdoptionPoint {
                row: r.row,
                ai_adoption_rate: r.ai_adoption_rate,
                depreciation_rate: r.depreciation_rate,
                acceleration_index: r.acceleration_index(),
                group: r.sector.clone().unwrap_or_else(|| r.skill_category.clone()),
            })
            .collect();
        let xs: Vec<f64> = points.iter().map(|p| p.ai_adoption_rate).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.depreciation_rate).collect();

        AdoptionVsDepreciation {
            trend: stats::linear_fit(&xs, &ys),
            points,
        }
    }

    fn urgency_buckets(records: &[SkillRecord]) -> Vec<UrgencyBucket> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut counts: BTreeMap<UrgencyBand, usize> = BTreeMap::new();
        for record in records {
            *counts.entry(record.urgency_band()).or_insert(0) += 1;
        }

        UrgencyBand::ALL
            .into_iter()
            .map(|band| {
                let count = counts.get(&band).copied().unwrap_or(0);
                let (lower_years, upper_years) = band.bounds();
                UrgencyBucket {
                    band,
                    label: band.label(),
                    lower_years,
                    upper_years,
                    count,
                    share: count as f64 / records.len() as f64,
                }
            })
            .collect()
    }

    fn viability_by_category(records: &[SkillRecord]) -> Vec<CategoryViability> {
        group_by(records, |r| {
            r.reskilling_months.map(|_| r.skill_category.as_str())
        })
        .into_iter()
        .filter_map(|(category, group)| {
            let reskilling: Vec<f64> = group
                .iter()
                .filter_map(|r| r.reskilling_months)
                .map(f64::from)
                .collect();
            let half_lives: Vec<f64> = group.iter().map(|r| r.obsolescence_years).collect();
            let ratios: Vec<f64> = group.iter().filter_map(|r| r.viability_ratio()).collect();

            let mean_reskilling_months = stats::mean(&reskilling)?;
            let mean_half_life_years = stats::mean(&half_lives)?;
            Some(CategoryViability {
                category: category.to_string(),
                records: group.len(),
                mean_reskilling_months,
                mean_half_life_years,
                mean_viability_ratio: stats::mean(&ratios),
                viable: mean_reskilling_months < mean_half_life_years * 12.0,
            })
        })
        .collect()
    }

    fn temporal_trend(records: &[SkillRecord]) -> Vec<YearPoint> {
        group_by(records, |r| r.year)
            .into_iter()
            .filter_map(|(year, group)| {
                let half_lives: Vec<f64> = group.iter().map(|r| r.obsolescence_years).collect();
                Some(YearPoint {
                    year,
                    count: half_lives.len(),
                    mean: stats::mean(&half_lives)?,
                    median: stats::median(&half_lives)?,
                    std_dev: stats::sample_std(&half_lives),
                })
            })
            .collect()
    }

    fn risk_profile(records: &[SkillRecord]) -> Vec<RiskPoint> {
        records
            .iter()
            .filter_map(|r| {
                Some(RiskPoint {
                    row: r.row,
                    ai_adoption_rate: r.ai_adoption_rate,
                    depreciation_rate: r.depreciation_rate,
                    reskilling_months: r.reskilling_months?,
                    obsolescence_years: r.obsolescence_years,
                    band: r.urgency_band(),
                })
            })
            .collect()
    }

    fn sector_breakdown(records: &[SkillRecord]) -> Vec<SectorSummary> {
        group_by(records, |r| r.sector.as_deref())
            .into_iter()
            .filter_map(|(sector, group)| {
                let half_lives: Vec<f64> = group.iter().map(|r| r.obsolescence_years).collect();
                let critical = group.iter().filter(|r| r.is_critical()).count();
                Some(SectorSummary {
                    sector: sector.to_string(),
                    count: group.len(),
                    mean_half_life_years: stats::mean(&half_lives)?,
                    critical_share: critical as f64 / group.len() as f64,
                })
            })
            .collect()
    }
}

/// Groups records by a key in ascending key order, skipping records without one.
fn group_by<'a, K, F>(records: &'a [SkillRecord], key: F) -> BTreeMap<K, Vec<&'a SkillRecord>>
where
    K: Ord,
    F: Fn(&'a SkillRecord) -> Option<K>,
{
    let mut groups: BTreeMap<K, Vec<&'a SkillRecord>> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(record);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::YearRange;

    fn record(row: usize, category: &str, years: f64) -> SkillRecord {
        SkillRecord {
            row,
            obsolescence_years: years,
            skill_category: category.to_string(),
            ai_adoption_rate: 10.0 * row as f64,
            depreciation_rate: 0.1 * row as f64,
            sector: None,
            reskilling_months: None,
            year: None,
            region: None,
        }
    }

    fn table_of_years(years: &[f64]) -> CleanTable {
        CleanTable::from_records(
            years
                .iter()
                .enumerate()
                .map(|(i, y)| record(i + 1, "Data", *y))
                .collect(),
        )
    }

    fn full_table() -> CleanTable {
        let rows = [
            ("Software", "Finance", 1.5, 6, 2020, "EU"),
            ("Software", "Retail", 3.0, 48, 2021, "US"),
            ("Design", "Retail", 6.0, 12, 2021, "EU"),
            ("Design", "Finance", 12.0, 24, 2022, "US"),
            ("Trades", "Energy", 2.0, 30, 2022, "EU"),
        ];
        CleanTable::from_records(
            rows.iter()
                .enumerate()
                .map(|(i, (category, sector, years, months, year, region))| SkillRecord {
                    sector: Some(sector.to_string()),
                    reskilling_months: Some(*months),
                    year: Some(*year),
                    region: Some(region.to_string()),
                    ..record(i + 1, category, *years)
                })
                .collect(),
        )
    }

    #[test]
    fn median_of_even_count_is_midpoint() {
        let kpis = MetricDeriver::new().derive_kpis(&table_of_years(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(kpis.median_half_life_years, Measure::Value(2.5));
    }

    #[test]
    fn critical_share_counts_values_below_two() {
        let kpis = MetricDeriver::new().derive_kpis(&table_of_years(&[1.0, 1.0, 3.0, 5.0]));
        assert_eq!(kpis.critical_share, Measure::Value(0.5));
    }

    #[test]
    fn viability_without_reskilling_data_is_not_applicable() {
        let kpis = MetricDeriver::new().derive_kpis(&table_of_years(&[1.0, 4.0]));
        assert_eq!(kpis.reskilling_viable_share, Measure::NotApplicable);
        assert_eq!(kpis.mean_reskilling_months, Measure::NotApplicable);
    }

    #[test]
    fn viability_share_uses_rows_with_reskilling_only() {
        let mut records = vec![
            record(1, "Data", 1.0),
            record(2, "Data", 2.0),
            record(3, "Data", 9.0),
        ];
        records[0].reskilling_months = Some(18); // 12 months of half-life: not viable
        records[1].reskilling_months = Some(6); // 24 months of half-life: viable
        let kpis = MetricDeriver::new().derive_kpis(&CleanTable::from_records(records));

        assert_eq!(kpis.reskilling_viable_share, Measure::Value(0.5));
        assert_eq!(kpis.mean_reskilling_months, Measure::Value(12.0));
        assert_eq!(kpis.records, 3);
    }

    #[test]
    fn kpis_are_deterministic() {
        let deriver = MetricDeriver::new();
        let table = full_table();
        let first = deriver.derive_kpis(&table);
        let second = deriver.derive_kpis(&table);
        assert_eq!(first, second);
        let bits = |k: &KpiSet| k.median_half_life_years.value().map(|v| v.to_bits());
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn boundary_value_falls_in_upper_band() {
        let aggregates = MetricDeriver::new()
            .derive_chart_aggregates(&table_of_years(&[2.0]), &FilterSet::new());
        let counts: Vec<(UrgencyBand, usize)> =
            aggregates.urgency.iter().map(|b| (b.band, b.count)).collect();
        assert_eq!(
            counts,
            vec![
                (UrgencyBand::Critical, 0),
                (UrgencyBand::High, 1),
                (UrgencyBand::Moderate, 0),
                (UrgencyBand::Low, 0),
            ]
        );
    }

    #[test]
    fn unmatched_filter_gives_empty_views() {
        let filters = FilterSet::new().with_category("Astrology");
        let aggregates = MetricDeriver::new().derive_chart_aggregates(&full_table(), &filters);

        assert!(aggregates.is_empty());
        assert_eq!(aggregates.total_rows, 5);
        assert!(aggregates.category_distribution.is_empty());
        assert!(aggregates.adoption_vs_depreciation.points.is_empty());
        assert_eq!(aggregates.adoption_vs_depreciation.trend, Measure::NoData);
        assert!(aggregates.urgency.is_empty());
        assert!(aggregates.viability.is_empty());
        assert!(aggregates.temporal_trend.is_empty());
        assert!(aggregates.risk_profile.is_empty());
        assert!(aggregates.sector_breakdown.is_empty());
        assert!(aggregates.disabled_views.is_empty());
        assert_eq!(aggregates.kpis, KpiSet::empty());
    }

    #[test]
    fn identical_adoption_rates_have_no_trend() {
        let records: Vec<SkillRecord> = (1..=4)
            .map(|i| SkillRecord {
                ai_adoption_rate: 55.0,
                ..record(i, "Data", i as f64)
            })
            .collect();
        let aggregates = MetricDeriver::new()
            .derive_chart_aggregates(&CleanTable::from_records(records), &FilterSet::new());
        assert_eq!(aggregates.adoption_vs_depreciation.trend, Measure::NoTrend);
        assert_eq!(aggregates.adoption_vs_depreciation.points.len(), 4);
    }

    #[test]
    fn missing_year_disables_temporal_view_only() {
        let table = table_of_years(&[1.0, 3.0, 8.0]);
        let deriver = MetricDeriver::new();
        let aggregates = deriver.derive_chart_aggregates(&table, &FilterSet::new());

        assert!(aggregates.is_disabled(ChartView::TemporalTrend));
        assert!(aggregates.temporal_trend.is_empty());
        assert!(!aggregates.is_disabled(ChartView::CategoryDistribution));
        assert!(aggregates.kpis.median_half_life_years.value().is_some());
        assert_eq!(
            aggregates.disabled_views,
            vec![
                ChartView::Viability,
                ChartView::TemporalTrend,
                ChartView::RiskProfile,
                ChartView::SectorBreakdown,
            ]
        );
    }

    #[test]
    fn category_distribution_is_sorted_and_flagged() {
        let aggregates =
            MetricDeriver::new().derive_chart_aggregates(&full_table(), &FilterSet::new());
        let design = &aggregates.category_distribution[0];

        assert_eq!(design.category, "Design");
        assert_eq!(design.values, vec![6.0, 12.0]);
        assert_eq!(design.median, 9.0);
        assert_eq!(design.q1, 7.5);
        assert!(!design.below_domain_threshold);

        let software = &aggregates.category_distribution[1];
        assert_eq!(software.category, "Software");
        assert!(software.below_domain_threshold);
        assert_eq!(aggregates.category_distribution[2].category, "Trades");
    }

    #[test]
    fn viability_flags_categories_by_mean_times() {
        let aggregates =
            MetricDeriver::new().derive_chart_aggregates(&full_table(), &FilterSet::new());
        let by_category: BTreeMap<&str, &CategoryViability> = aggregates
            .viability
            .iter()
            .map(|v| (v.category.as_str(), v))
            .collect();

        // Software: mean reskilling 27 months vs mean half-life 2.25 years (27 months).
        assert!(!by_category["Software"].viable);
        assert_eq!(by_category["Software"].mean_reskilling_months, 27.0);
        // Design: 18 months vs 9 years.
        assert!(by_category["Design"].viable);
        assert_eq!(by_category["Design"].mean_viability_ratio, Some(6.0));
    }

    #[test]
    fn temporal_trend_is_ordered_by_year() {
        let aggregates =
            MetricDeriver::new().derive_chart_aggregates(&full_table(), &FilterSet::new());
        let years: Vec<i32> = aggregates.temporal_trend.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
        assert_eq!(aggregates.temporal_trend[0].std_dev, None);
        assert_eq!(aggregates.temporal_trend[1].mean, 4.5);
    }

    #[test]
    fn filters_combine_and_keep_availability() {
        let filters = FilterSet::new()
            .with_sector("Retail")
            .with_years(YearRange::new(2021, 2021).unwrap());
        let aggregates = MetricDeriver::new().derive_chart_aggregates(&full_table(), &filters);

        assert_eq!(aggregates.matched_rows, 2);
        assert_eq!(aggregates.risk_profile.len(), 2);
        assert_eq!(aggregates.sector_breakdown.len(), 1);
        assert_eq!(aggregates.sector_breakdown[0].sector, "Retail");
        assert!(aggregates.disabled_views.is_empty());
    }

    #[test]
    fn scatter_groups_by_sector() {
        let aggregates =
            MetricDeriver::new().derive_chart_aggregates(&full_table(), &FilterSet::new());
        let points = &aggregates.adoption_vs_depreciation.points;
        assert_eq!(points[0].group, "Finance");
        assert!((points[0].acceleration_index - 1.0).abs() < 1e-12);
        let trend = aggregates.adoption_vs_depreciation.trend.value().unwrap();
        assert!((trend.slope - 0.01).abs() < 1e-12);
    }

    #[test]
    fn filter_options_are_sorted_and_distinct() {
        let options = MetricDeriver::new().filter_options(&full_table());
        assert_eq!(options.categories, vec!["Design", "Software", "Trades"]);
        assert_eq!(options.sectors, vec!["Energy", "Finance", "Retail"]);
        assert_eq!(options.regions, vec!["EU", "US"]);
        assert_eq!(options.year_span, Some((2020, 2022)));
    }
}
