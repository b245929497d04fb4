use crate::enums::{UrgencyBand, CRITICAL_THRESHOLD_YEARS};
use serde::{Deserialize, Serialize};

/// One cleaned row of the dataset.
///
/// Required fields are always present and numeric fields are finite. Optional
/// columns are `None` when the column is absent from the file, the cell is
/// empty, or the cell failed to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// 1-based data row number in the source file (header excluded).
    pub row: usize,
    /// Years until the skill has lost 50% of its value.
    pub obsolescence_years: f64,
    pub skill_category: String,
    /// Percentage, nominally within `[0, 100]`.
    pub ai_adoption_rate: f64,
    pub depreciation_rate: f64,
    pub sector: Option<String>,
    pub reskilling_months: Option<u32>,
    pub year: Option<i32>,
    pub region: Option<String>,
}

impl SkillRecord {
    pub fn half_life_months(&self) -> f64 {
        self.obsolescence_years * 12.0
    }

    /// Combined pressure of AI adoption and depreciation.
    pub fn acceleration_index(&self) -> f64 {
        self.ai_adoption_rate * self.depreciation_rate
    }

    pub fn urgency_band(&self) -> UrgencyBand {
        UrgencyBand::classify(self.obsolescence_years)
    }

    pub fn is_critical(&self) -> bool {
        self.obsolescence_years < CRITICAL_THRESHOLD_YEARS
    }

    /// Months of useful skill life left once reskilling completes.
    pub fn reskilling_payoff_months(&self) -> Option<f64> {
        self.reskilling_months
            .map(|months| self.half_life_months() - f64::from(months))
    }

    /// `Some(true)` when reskilling finishes strictly before the half-life elapses.
    pub fn has_positive_payoff(&self) -> Option<bool> {
        self.reskilling_payoff_months().map(|payoff| payoff > 0.0)
    }

    /// Half-life in months divided by reskilling months. `None` when reskilling
    /// is unknown or takes zero months.
    pub fn viability_ratio(&self) -> Option<f64> {
        match self.reskilling_months {
            Some(months) if months > 0 => Some(self.half_life_months() / f64::from(months)),
            _ => None,
        }
    }
}
