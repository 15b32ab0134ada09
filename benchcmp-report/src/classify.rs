//! Turning per-KPI statistics into a verdict.

use std::fmt;

use crate::config::Thresholds;

/// Verdict for one KPI of one configuration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Conclusion {
    DataInvalid,
    VarianceTooLarge,
    NoDifference,
    NoSignificance,
    MajorImprovement,
    MinorImprovement,
    MajorRegression,
    MinorRegression,
}

impl Conclusion {
    pub const ALL: [Conclusion; 8] = [
        Conclusion::DataInvalid,
        Conclusion::VarianceTooLarge,
        Conclusion::NoDifference,
        Conclusion::NoSignificance,
        Conclusion::MajorImprovement,
        Conclusion::MinorImprovement,
        Conclusion::MajorRegression,
        Conclusion::MinorRegression,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Conclusion::DataInvalid => "Data Invalid",
            Conclusion::VarianceTooLarge => "Variance Too Large",
            Conclusion::NoDifference => "No Difference",
            Conclusion::NoSignificance => "No Significance",
            Conclusion::MajorImprovement => "Major Improvement",
            Conclusion::MinorImprovement => "Minor Improvement",
            Conclusion::MajorRegression => "Major Regression",
            Conclusion::MinorRegression => "Minor Regression",
        }
    }

    pub fn is_regression(self) -> bool {
        matches!(self, Conclusion::MajorRegression | Conclusion::MinorRegression)
    }

    pub fn is_improvement(self) -> bool {
        matches!(self, Conclusion::MajorImprovement | Conclusion::MinorImprovement)
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a KPI. The checks run in order and the first match wins:
/// undefined input, variance gate, zero difference, significance gate,
/// then direction and magnitude.
pub fn classify(
    base_pct_sd: f64,
    test_pct_sd: f64,
    pct_diff: f64,
    significance: f64,
    higher_is_better: bool,
    thresholds: &Thresholds,
) -> Conclusion {
    if base_pct_sd.is_nan() || test_pct_sd.is_nan() || pct_diff.is_nan() || significance.is_nan() {
        return Conclusion::DataInvalid;
    }

    if base_pct_sd > thresholds.max_pct_dev || test_pct_sd > thresholds.max_pct_dev {
        return Conclusion::VarianceTooLarge;
    }

    if pct_diff == 0.0 {
        return Conclusion::NoDifference;
    }

    if significance < thresholds.confidence_threshold {
        return Conclusion::NoSignificance;
    }

    let favorable = (higher_is_better && pct_diff > 0.0) || (!higher_is_better && pct_diff < 0.0);
    let major = pct_diff.abs() >= thresholds.regression_threshold;

    match (favorable, major) {
        (true, true) => Conclusion::MajorImprovement,
        (true, false) => Conclusion::MinorImprovement,
        (false, true) => Conclusion::MajorRegression,
        (false, false) => Conclusion::MinorRegression,
    }
}
