use crate::error::CoreError;
use crate::structs::SkillRecord;
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    from: i32,
    to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::InvalidInput(
                "year range".to_string(),
                format!("start {from} is after end {to}"),
            ));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> i32 {
        self.to
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.from..=self.to).contains(&year)
    }
}

/// The restrictions currently selected by the user. Every present restriction
/// must hold for a record to pass; a record lacking the targeted field fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub category: Option<String>,
    pub sector: Option<String>,
    pub region: Option<String>,
    pub years: Option<YearRange>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = Some(years);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.sector.is_none()
            && self.region.is_none()
            && self.years.is_none()
    }

    pub fn matches(&self, record: &SkillRecord) -> bool {
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|c| *c == record.skill_category);
        let sector_ok = self
            .sector
            .as_ref()
            .is_none_or(|s| record.sector.as_ref() == Some(s));
        let region_ok = self
            .region
            .as_ref()
            .is_none_or(|r| record.region.as_ref() == Some(r));
        let years_ok = self
            .years
            .is_none_or(|range| record.year.is_some_and(|y| range.contains(y)));

        category_ok && sector_ok && region_ok && years_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SkillRecord {
        SkillRecord {
            row: 1,
            obsolescence_years: 4.0,
            skill_category: "Software".to_string(),
            ai_adoption_rate: 70.0,
            depreciation_rate: 0.3,
            sector: Some("Finance".to_string()),
            reskilling_months: Some(9),
            year: Some(2023),
            region: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(FilterSet::new().is_empty());
        assert!(FilterSet::new().matches(&record()));
    }

    #[test]
    fn all_restrictions_must_hold() {
        let r = record();
        assert!(FilterSet::new().with_category("Software").with_sector("Finance").matches(&r));
        assert!(!FilterSet::new().with_category("Software").with_sector("Retail").matches(&r));
        assert!(!FilterSet::new().with_category("Design").matches(&r));
    }

    #[test]
    fn missing_field_fails_restriction() {
        assert!(!FilterSet::new().with_region("EU").matches(&record()));
    }

    #[test]
    fn year_range_is_inclusive_and_ordered() {
        let range = YearRange::new(2020, 2023).unwrap();
        assert!(range.contains(2020) && range.contains(2023));
        assert!(!range.contains(2024));
        assert!(FilterSet::new().with_years(range).matches(&record()));
        assert!(YearRange::new(2024, 2020).is_err());
    }
}
