use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-life below which a skill counts as critical. Also the upper edge of
/// the `Critical` urgency band.
pub const CRITICAL_THRESHOLD_YEARS: f64 = 2.0;

/// Lower edges of the `High`, `Moderate` and `Low` bands, in years.
const BAND_EDGES: [f64; 3] = [CRITICAL_THRESHOLD_YEARS, 5.0, 10.0];

/// A column of the skill half-life dataset, identified by its canonical name.
///
/// The CSV header for each column is case-sensitive. `Sector` and `Region`
/// additionally accept one alias each (`Industry`, `Country`); whichever
/// header is found is normalised to the canonical column here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    ObsolescenceYears,
    SkillCategory,
    AiAdoptionRate,
    DepreciationRate,
    Sector,
    ReskillingMonths,
    Year,
    Region,
}

impl Column {
    pub const REQUIRED: [Column; 4] = [
        Column::ObsolescenceYears,
        Column::SkillCategory,
        Column::AiAdoptionRate,
        Column::DepreciationRate,
    ];

    pub const OPTIONAL: [Column; 4] = [
        Column::Sector,
        Column::ReskillingMonths,
        Column::Year,
        Column::Region,
    ];

    /// The canonical CSV header for this column.
    pub fn header(&self) -> &'static str {
        match self {
            Column::ObsolescenceYears => "Years_to_50_Percent_Obsolescence",
            Column::SkillCategory => "Skill_Category",
            Column::AiAdoptionRate => "AI_Adoption_Rate",
            Column::DepreciationRate => "Skill_Depreciation_Rate",
            Column::Sector => "Sector",
            Column::ReskillingMonths => "Reskilling_Time_Months",
            Column::Year => "Year",
            Column::Region => "Region",
        }
    }

    /// Alternative headers accepted for this column, in addition to `header()`.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Sector => &["Industry"],
            Column::Region => &["Country"],
            _ => &[],
        }
    }

    pub fn is_required(&self) -> bool {
        Column::REQUIRED.contains(self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Intervention priority derived from a skill's half-life.
///
/// Bands are half-open `[lower, upper)` intervals; a value on a boundary
/// belongs to the band it opens. `Low` has no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyBand {
    Critical,
    High,
    Moderate,
    Low,
}

impl UrgencyBand {
    /// All bands, most urgent first.
    pub const ALL: [UrgencyBand; 4] = [
        UrgencyBand::Critical,
        UrgencyBand::High,
        UrgencyBand::Moderate,
        UrgencyBand::Low,
    ];

    pub fn classify(years: f64) -> Self {
        if years < BAND_EDGES[0] {
            UrgencyBand::Critical
        } else if years < BAND_EDGES[1] {
            UrgencyBand::High
        } else if years < BAND_EDGES[2] {
            UrgencyBand::Moderate
        } else {
            UrgencyBand::Low
        }
    }

    /// Returns `(lower, upper)` in years. `upper` is `None` for the open top band.
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match self {
            UrgencyBand::Critical => (0.0, Some(BAND_EDGES[0])),
            UrgencyBand::High => (BAND_EDGES[0], Some(BAND_EDGES[1])),
            UrgencyBand::Moderate => (BAND_EDGES[1], Some(BAND_EDGES[2])),
            UrgencyBand::Low => (BAND_EDGES[2], None),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyBand::Critical => "Critical (<2y)",
            UrgencyBand::High => "High (2-5y)",
            UrgencyBand::Moderate => "Moderate (5-10y)",
            UrgencyBand::Low => "Low (>10y)",
        }
    }
}

impl fmt::Display for UrgencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values_open_the_next_band() {
        assert_eq!(UrgencyBand::classify(1.999), UrgencyBand::Critical);
        assert_eq!(UrgencyBand::classify(2.0), UrgencyBand::High);
        assert_eq!(UrgencyBand::classify(5.0), UrgencyBand::Moderate);
        assert_eq!(UrgencyBand::classify(10.0), UrgencyBand::Low);
        assert_eq!(UrgencyBand::classify(250.0), UrgencyBand::Low);
    }

    #[test]
    fn bounds_agree_with_classification() {
        for band in UrgencyBand::ALL {
            let (lower, _) = band.bounds();
            assert_eq!(UrgencyBand::classify(lower), band);
        }
    }

    #[test]
    fn aliases_only_exist_for_sector_and_region() {
        assert_eq!(Column::Sector.aliases(), &["Industry"]);
        assert_eq!(Column::Region.aliases(), &["Country"]);
        assert!(Column::REQUIRED.iter().all(|c| c.aliases().is_empty()));
        assert!(Column::ObsolescenceYears.is_required());
        assert!(!Column::Year.is_required());
    }
}
