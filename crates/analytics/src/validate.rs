use crate::error::AnalyticsError;
use crate::schema::Schema;
use crate::table::CleanTable;
use core_types::{Column, SkillRecord};
use loader::{RawRow, RawTable};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Why a cell was rejected or flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Required cell empty or the row too short to contain it.
    Missing,
    NotNumeric,
    /// `NaN` or infinite.
    NonFinite,
    Negative,
    EmptyCategory,
    /// Parsed, but outside the expected range. The row is kept.
    OutOfRange,
    /// A whole number was expected.
    NotInteger,
}

impl IssueKind {
    /// Whether this is a failure to read the cell as a number.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, IssueKind::NotNumeric | IssueKind::NonFinite | IssueKind::NotInteger)
    }
}

/// A per-row warning. Never fatal on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub column: Column,
    pub kind: IssueKind,
    pub raw: String,
    /// True when the issue excluded the row from every aggregate.
    pub dropped: bool,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IssueKind::Missing => "missing",
            IssueKind::NotNumeric => "not numeric",
            IssueKind::NonFinite => "not finite",
            IssueKind::Negative => "negative",
            IssueKind::EmptyCategory => "empty category",
            IssueKind::OutOfRange => "out of range",
            IssueKind::NotInteger => "not a whole number",
        };
        f.write_str(text)
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, {}: {} ({:?})", self.row, self.column, self.kind, self.raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
    /// Rows dropped because of each required column. A row failing several
    /// required columns is counted under each of them.
    pub dropped_by_field: BTreeMap<Column, usize>,
    /// Optional columns with no header, or with no usable value in any row.
    pub absent_optional: Vec<Column>,
    pub issues: Vec<RowIssue>,
}

impl ValidationReport {
    pub fn parse_failures(&self) -> impl Iterator<Item = &RowIssue> {
        self.issues.iter().filter(|i| i.kind.is_parse_failure())
    }

    /// Issues on rows that were kept.
    pub fn warnings(&self) -> impl Iterator<Item = &RowIssue> {
        self.issues.iter().filter(|i| !i.dropped)
    }
}

/// The outcome of a successful `validate`: the cleaned rows and what was
/// removed or flagged on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedTable {
    pub table: CleanTable,
    pub report: ValidationReport,
}

/// Checks the schema, then cleans every row.
///
/// Malformed rows are excluded and reported. Fails only when a required column
/// is absent from the header (`Schema`) or when no row survives (`Data`).
pub fn validate(raw: &RawTable) -> Result<ValidatedTable, AnalyticsError> {
    let schema = Schema::resolve(raw.headers())?;

    let mut issues = Vec::new();
    let mut dropped_by_field: BTreeMap<Column, usize> = BTreeMap::new();
    let mut records = Vec::with_capacity(raw.len());

    for row in raw.rows() {
        match clean_row(&schema, row, &mut issues) {
            Ok(record) => records.push(record),
            Err(failed) => {
                for column in failed {
                    *dropped_by_field.entry(column).or_insert(0) += 1;
                }
            }
        }
    }

    let total_rows = raw.len();
    let kept_rows = records.len();
    if kept_rows == 0 {
        return Err(AnalyticsError::Data { total_rows, issues });
    }

    let table = CleanTable::from_records(records);
    let absent_optional: Vec<Column> = Column::OPTIONAL
        .into_iter()
        .filter(|c| !table.has(*c))
        .collect();
    let known_absent: BTreeSet<Column> = schema.absent_optional().into_iter().collect();
    for column in absent_optional.iter().filter(|c| !known_absent.contains(*c)) {
        tracing::debug!(column = %column, "Optional column present but holds no usable value.");
    }

    let dropped_rows = total_rows - kept_rows;
    if dropped_rows > 0 {
        tracing::warn!(dropped_rows, total_rows, "Dropped rows failing required-field validation.");
    }

    Ok(ValidatedTable {
        table,
        report: ValidationReport {
            total_rows,
            kept_rows,
            dropped_rows,
            dropped_by_field,
            absent_optional,
            issues,
        },
    })
}

/// Cleans one row. On failure returns the required columns that caused the drop.
fn clean_row(
    schema: &Schema,
    row: &RawRow,
    issues: &mut Vec<RowIssue>,
) -> Result<SkillRecord, Vec<Column>> {
    let cell = |column: Column| {
        schema
            .position(column)
            .and_then(|index| row.get(index))
            .unwrap_or("")
    };

    let obsolescence = parse_non_negative(cell(Column::ObsolescenceYears));
    let category = match cell(Column::SkillCategory) {
        "" => Err(IssueKind::EmptyCategory),
        text => Ok(text.to_string()),
    };
    let adoption = parse_finite(cell(Column::AiAdoptionRate));
    let depreciation = parse_non_negative(cell(Column::DepreciationRate));

    let failures: Vec<(Column, IssueKind)> = [
        (Column::ObsolescenceYears, obsolescence.err()),
        (Column::SkillCategory, category.as_ref().err().copied()),
        (Column::AiAdoptionRate, adoption.err()),
        (Column::DepreciationRate, depreciation.err()),
    ]
    .into_iter()
    .filter_map(|(column, kind)| kind.map(|k| (column, k)))
    .collect();

    let (Ok(obsolescence_years), Ok(skill_category), Ok(ai_adoption_rate), Ok(depreciation_rate)) =
        (obsolescence, category, adoption, depreciation)
    else {
        for &(column, kind) in &failures {
            issues.push(RowIssue {
                row: row.row(),
                column,
                kind,
                raw: cell(column).to_string(),
                dropped: true,
            });
        }
        return Err(failures.into_iter().map(|(column, _)| column).collect());
    };

    let mut warn = |column: Column, kind: IssueKind| {
        issues.push(RowIssue {
            row: row.row(),
            column,
            kind,
            raw: cell(column).to_string(),
            dropped: false,
        });
    };

    if !(0.0..=100.0).contains(&ai_adoption_rate) {
        warn(Column::AiAdoptionRate, IssueKind::OutOfRange);
    }

    let reskilling_months = parse_optional_count(cell(Column::ReskillingMonths))
        .unwrap_or_else(|kind| {
            warn(Column::ReskillingMonths, kind);
            None
        });
    let year = parse_optional_year(cell(Column::Year)).unwrap_or_else(|kind| {
        warn(Column::Year, kind);
        None
    });

    Ok(SkillRecord {
        row: row.row(),
        obsolescence_years,
        skill_category,
        ai_adoption_rate,
        depreciation_rate,
        sector: non_empty(cell(Column::Sector)),
        reskilling_months,
        year,
        region: non_empty(cell(Column::Region)),
    })
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn parse_finite(text: &str) -> Result<f64, IssueKind> {
    if text.is_empty() {
        return Err(IssueKind::Missing);
    }
    let value: f64 = text.parse().map_err(|_| IssueKind::NotNumeric)?;
    if !value.is_finite() {
        return Err(IssueKind::NonFinite);
    }
    Ok(value)
}

fn parse_non_negative(text: &str) -> Result<f64, IssueKind> {
    let value = parse_finite(text)?;
    if value < 0.0 {
        return Err(IssueKind::Negative);
    }
    Ok(value)
}

/// Parses a whole number written either as `12` or `12.0`.
fn parse_whole(text: &str) -> Result<Option<f64>, IssueKind> {
    match parse_finite(text) {
        Err(IssueKind::Missing) => Ok(None),
        Err(kind) => Err(kind),
        Ok(value) if value.fract() != 0.0 => Err(IssueKind::NotInteger),
        Ok(value) => Ok(Some(value)),
    }
}

fn parse_optional_count(text: &str) -> Result<Option<u32>, IssueKind> {
    match parse_whole(text)? {
        None => Ok(None),
        Some(value) if value < 0.0 => Err(IssueKind::Negative),
        Some(value) if value > f64::from(u32::MAX) => Err(IssueKind::OutOfRange),
        Some(value) => Ok(Some(value as u32)),
    }
}

fn parse_optional_year(text: &str) -> Result<Option<i32>, IssueKind> {
    match parse_whole(text)? {
        None => Ok(None),
        Some(value) if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) => {
            Err(IssueKind::OutOfRange)
        }
        Some(value) => Ok(Some(value as i32)),
    }
}
