use serde::Serialize;

/// A computed value, or the reason it could not be computed for the current
/// subset of rows. Undefined results are never reported as errors or zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Measure<T> {
    Value(T),
    /// A ratio whose denominator is zero, or a mean over no contributing rows.
    NotApplicable,
    /// A regression whose independent variable has no variance.
    NoTrend,
    /// No rows to compute from.
    NoData,
}

impl<T> Measure<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Measure::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Short status label for display next to a missing value.
    pub fn status(&self) -> &'static str {
        match self {
            Measure::Value(_) => "value",
            Measure::NotApplicable => "n/a",
            Measure::NoTrend => "no trend",
            Measure::NoData => "no data",
        }
    }
}

impl Measure<f64> {
    /// Wraps `numerator / denominator`, or `NotApplicable` when the denominator is zero.
    pub fn ratio(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Measure::NotApplicable
        } else {
            Measure::Value(numerator as f64 / denominator as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_with_zero_denominator_is_not_applicable() {
        assert_eq!(Measure::ratio(0, 0), Measure::NotApplicable);
        assert_eq!(Measure::ratio(1, 4), Measure::Value(0.25));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(Measure::Value(2.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "value", "value": 2.5 }));

        let json = serde_json::to_value(Measure::<f64>::NoTrend).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "no_trend" }));
    }
}
