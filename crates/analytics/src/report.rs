use crate::measure::Measure;
use crate::stats::LinearTrend;
use core_types::{FilterSet, UrgencyBand};
use serde::Serialize;

/// The four headline indicators.
///
/// Every field is a `Measure` because any of them may be undefined for a
/// filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSet {
    /// Rows the KPIs were computed over.
    pub records: usize,
    pub median_half_life_years: Measure<f64>,
    /// Fraction of rows with a half-life under two years.
    pub critical_share: Measure<f64>,
    pub mean_reskilling_months: Measure<f64>,
    /// Fraction of rows with reskilling data whose reskilling finishes before
    /// the half-life elapses.
    pub reskilling_viable_share: Measure<f64>,
}

impl KpiSet {
    /// The KPI set of an empty subset.
    pub fn empty() -> Self {
        Self {
            records: 0,
            median_half_life_years: Measure::NoData,
            critical_share: Measure::NotApplicable,
            mean_reskilling_months: Measure::NotApplicable,
            reskilling_viable_share: Measure::NotApplicable,
        }
    }
}

/// The chart views a rendering layer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartView {
    CategoryDistribution,
    AdoptionVsDepreciation,
    Urgency,
    Viability,
    TemporalTrend,
    RiskProfile,
    SectorBreakdown,
}

/// Box-plot statistics of half-life within one skill category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Sorted half-life values.
    pub values: Vec<f64>,
    /// Median under the configured domain threshold.
    pub below_domain_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdoptionPoint {
    pub row: usize,
    pub ai_adoption_rate: f64,
    pub depreciation_rate: f64,
    pub acceleration_index: f64,
    /// Sector when known, otherwise the skill category.
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdoptionVsDepreciation {
    pub points: Vec<AdoptionPoint>,
    pub trend: Measure<LinearTrend>,
}

impl AdoptionVsDepreciation {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            trend: Measure::NoData,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrgencyBucket {
    pub band: UrgencyBand,
    pub label: &'static str,
    pub lower_years: f64,
    pub upper_years: Option<f64>,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryViability {
    pub category: String,
    pub records: usize,
    pub mean_reskilling_months: f64,
    pub mean_half_life_years: f64,
    /// Mean of per-row half-life-months / reskilling-months, skipping zero-month rows.
    pub mean_viability_ratio: Option<f64>,
    /// Mean reskilling time is shorter than the mean half-life.
    pub viable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPoint {
    pub row: usize,
    pub ai_adoption_rate: f64,
    pub depreciation_rate: f64,
    pub reskilling_months: u32,
    pub obsolescence_years: f64,
    pub band: UrgencyBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorSummary {
    pub sector: String,
    pub count: usize,
    pub mean_half_life_years: f64,
    pub critical_share: f64,
}

/// Everything the dashboard draws, computed from the rows passing `filters`.
///
/// Views whose optional column is absent from the dataset are empty and listed
/// in `disabled_views`. A filter matching no rows leaves every view empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartAggregates {
    pub filters: FilterSet,
    pub total_rows: usize,
    pub matched_rows: usize,
    pub kpis: KpiSet,
    pub category_distribution: Vec<CategoryDistribution>,
    pub adoption_vs_depreciation: AdoptionVsDepreciation,
    pub urgency: Vec<UrgencyBucket>,
    pub viability: Vec<CategoryViability>,
    pub temporal_trend: Vec<YearPoint>,
    pub risk_profile: Vec<RiskPoint>,
    pub sector_breakdown: Vec<SectorSummary>,
    pub disabled_views: Vec<ChartView>,
}

impl ChartAggregates {
    pub fn is_empty(&self) -> bool {
        self.matched_rows == 0
    }

    pub fn is_disabled(&self, view: ChartView) -> bool {
        self.disabled_views.contains(&view)
    }
}

/// Choices the UI can offer as filters, each sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub sectors: Vec<String>,
    pub regions: Vec<String>,
    /// Earliest and latest year, when any row has one.
    pub year_span: Option<(i32, i32)>,
}
