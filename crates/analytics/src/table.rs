use core_types::{Column, FilterSet, SkillRecord};
use serde::Serialize;
use std::collections::BTreeSet;

/// Validated, strongly typed rows plus the set of columns the dataset carries.
///
/// Column availability is a property of the whole loaded dataset and is kept
/// when the table is filtered, so a filter that matches nothing yields empty
/// views rather than disabled ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanTable {
    records: Vec<SkillRecord>,
    available: BTreeSet<Column>,
}

impl CleanTable {
    /// Builds a table whose optional columns count as available when at least
    /// one record carries a value for them.
    pub fn from_records(records: Vec<SkillRecord>) -> Self {
        let mut available: BTreeSet<Column> = Column::REQUIRED.into_iter().collect();
        for record in &records {
            if record.sector.is_some() {
                available.insert(Column::Sector);
            }
            if record.reskilling_months.is_some() {
                available.insert(Column::ReskillingMonths);
            }
            if record.year.is_some() {
                available.insert(Column::Year);
            }
            if record.region.is_some() {
                available.insert(Column::Region);
            }
        }
        Self { records, available }
    }

    pub fn records(&self) -> &[SkillRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has(&self, column: Column) -> bool {
        self.available.contains(&column)
    }

    /// A new table holding only the records that pass `filters`.
    pub fn filter(&self, filters: &FilterSet) -> CleanTable {
        if filters.is_empty() {
            return self.clone();
        }
        let records: Vec<SkillRecord> = self
            .records
            .iter()
            .filter(|r| filters.matches(r))
            .cloned()
            .collect();
        tracing::debug!(matched = records.len(), total = self.records.len(), "Applied filters.");
        CleanTable {
            records,
            available: self.available.clone(),
        }
    }
}
