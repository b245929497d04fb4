use crate::error::AnalyticsError;
use core_types::Column;
use serde::Serialize;
use std::collections::BTreeMap;

/// Where each known column sits in the raw header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    positions: BTreeMap<Column, usize>,
}

impl Schema {
    /// Maps raw headers to canonical columns.
    ///
    /// The canonical header takes precedence over an alias when both appear.
    /// Fails with `AnalyticsError::Schema` listing every required column that
    /// has no matching header. Unknown headers are ignored.
    pub fn resolve(headers: &[String]) -> Result<Self, AnalyticsError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let mut positions = BTreeMap::new();

        for column in Column::REQUIRED.into_iter().chain(Column::OPTIONAL) {
            let canonical = find(column.header());
            let alias = column
                .aliases()
                .iter()
                .find_map(|alias| find(alias).map(|pos| (*alias, pos)));

            match (canonical, alias) {
                (Some(pos), Some((alias, _))) => {
                    tracing::debug!(
                        column = %column,
                        alias,
                        "Both header and alias present; using header."
                    );
                    positions.insert(column, pos);
                }
                (Some(pos), None) => {
                    positions.insert(column, pos);
                }
                (None, Some((alias, pos))) => {
                    tracing::debug!(column = %column, alias, "Resolved column through alias.");
                    positions.insert(column, pos);
                }
                (None, None) => {}
            }
        }

        let missing: Vec<Column> = Column::REQUIRED
            .into_iter()
            .filter(|c| !positions.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(AnalyticsError::Schema { missing });
        }

        Ok(Self { positions })
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    pub fn has(&self, column: Column) -> bool {
        self.positions.contains_key(&column)
    }

    /// Optional columns with no header at all.
    pub fn absent_optional(&self) -> Vec<Column> {
        Column::OPTIONAL
            .into_iter()
            .filter(|c| !self.has(*c))
            .collect()
    }
}
