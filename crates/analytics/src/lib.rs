//! # Halflife Analytics
//!
//! Turns a skill half-life dataset into the indicators and chart-ready views
//! of the dashboard.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no file I/O and no rendering. Input arrives as a
//!   `loader::RawTable`; output is plain serializable structs.
//! - **Validate once, derive often:** `validate` turns loosely typed rows into
//!   `SkillRecord`s and a `ValidationReport`. Derivation works on the typed
//!   `CleanTable` and is recomputed from scratch for every filter change.
//! - **Sentinels, not failures:** undefined results (empty subsets, zero
//!   denominators, flat regressors) are `Measure` variants. Only a missing
//!   required column or a dataset with no usable row is an `AnalyticsError`.
//!
//! ## Public API
//!
//! - `MetricDeriver`: `validate`, `derive_kpis`, `derive_chart_aggregates`, `filter_options`.
//! - `Session`: a loaded, validated dataset passed by reference to the deriver.
//! - `KpiSet`, `ChartAggregates` and the per-view structs.
//! - `AnalyticsError`: the dataset-level errors.

pub mod engine;
pub mod error;
pub mod measure;
pub mod report;
pub mod schema;
pub mod session;
pub mod stats;
pub mod table;
pub mod validate;

pub use engine::{MetricDeriver, DEFAULT_DOMAIN_THRESHOLD_YEARS};
pub use error::AnalyticsError;
pub use measure::Measure;
pub use report::{
    AdoptionPoint, AdoptionVsDepreciation, CategoryDistribution, CategoryViability, ChartAggregates,
    ChartView, FilterOptions, KpiSet, RiskPoint, SectorSummary, UrgencyBucket, YearPoint,
};
pub use schema::Schema;
pub use session::Session;
pub use stats::LinearTrend;
pub use table::CleanTable;
pub use validate::{IssueKind, RowIssue, ValidatedTable, ValidationReport};
