use crate::validate::RowIssue;
use core_types::Column;
use thiserror::Error;

/// Dataset-level failures. Row-level problems never surface here; they are
/// recorded in the `ValidationReport` and the row is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error(
        "Schema error: required column(s) missing from input: {}",
        join_headers(.missing)
    )]
    Schema { missing: Vec<Column> },

    #[error(
        "Data error: none of the {total_rows} row(s) passed required-field validation: {}",
        summarize_issues(.issues)
    )]
    Data {
        total_rows: usize,
        issues: Vec<RowIssue>,
    },
}

/// Issues listed in a `Data` error message before the rest are only counted.
const LISTED_ISSUES: usize = 5;

fn summarize_issues(issues: &[RowIssue]) -> String {
    let mut listed: Vec<String> = issues
        .iter()
        .take(LISTED_ISSUES)
        .map(|i| i.to_string())
        .collect();
    if issues.len() > LISTED_ISSUES {
        listed.push(format!("and {} more", issues.len() - LISTED_ISSUES));
    }
    if listed.is_empty() {
        return "the dataset has no data rows".to_string();
    }
    listed.join("; ")
}

fn join_headers(columns: &[Column]) -> String {
    columns
        .iter()
        .map(Column::header)
        .collect::<Vec<_>>()
        .join(", ")
}
