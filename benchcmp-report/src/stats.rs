//! Descriptive statistics and Student t-tests over replicate samples.
//!
//! Undefined results are NaN rather than errors so that one bad group only
//! invalidates its own cells. Missing samples (NaN inputs) are skipped by the
//! descriptive statistics and make the t-tests undefined.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Arithmetic mean of the present values; NaN when there are none.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Sample standard deviation (N - 1 denominator); NaN below two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.len() < 2 {
        return f64::NAN;
    }
    variance(&present, mean(&present)).sqrt()
}

/// Standard deviation as a percentage of the mean.
pub fn pct_std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    if avg == 0.0 {
        return f64::NAN;
    }
    sample_std_dev(values) / avg * 100.0
}

/// Percent change of the test mean relative to the base mean.
pub fn pct_diff(base_avg: f64, test_avg: f64) -> f64 {
    if base_avg == 0.0 {
        return f64::NAN;
    }
    (test_avg - base_avg) / base_avg * 100.0
}

fn variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Outcome of a two-sided t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

impl TTest {
    fn from_statistic(statistic: f64, degrees_of_freedom: f64) -> Option<Self> {
        if !statistic.is_finite() || degrees_of_freedom <= 0.0 {
            return None;
        }
        let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).ok()?;
        let p_value = (2.0 * dist.sf(statistic.abs())).clamp(0.0, 1.0);
        Some(Self {
            statistic,
            degrees_of_freedom,
            p_value,
        })
    }

    /// Independent two-sample test with pooled variance.
    pub fn unpaired(base: &[f64], test: &[f64]) -> Option<Self> {
        if base.len() < 2 || test.len() < 2 || base.iter().chain(test).any(|v| v.is_nan()) {
            return None;
        }

        let n1 = base.len() as f64;
        let n2 = test.len() as f64;
        let m1 = mean(base);
        let m2 = mean(test);
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * variance(base, m1) + (n2 - 1.0) * variance(test, m2)) / df;
        if pooled == 0.0 {
            return None;
        }

        let statistic = (m1 - m2) / (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
        Self::from_statistic(statistic, df)
    }

    /// Related-samples test on (base, test) pairs.
    pub fn paired(pairs: &[(f64, f64)]) -> Option<Self> {
        if pairs.len() < 2 || pairs.iter().any(|(b, t)| b.is_nan() || t.is_nan()) {
            return None;
        }

        let diffs: Vec<f64> = pairs.iter().map(|(b, t)| b - t).collect();
        let n = diffs.len() as f64;
        let m = mean(&diffs);
        let var = variance(&diffs, m);
        if var == 0.0 {
            return None;
        }

        let statistic = m / (var / n).sqrt();
        Self::from_statistic(statistic, n - 1.0)
    }

    /// One minus the p-value.
    pub fn significance(&self) -> f64 {
        1.0 - self.p_value
    }
}

/// Significance of an unpaired comparison; NaN when it cannot be computed.
pub fn unpaired_significance(base: &[f64], test: &[f64]) -> f64 {
    TTest::unpaired(base, test).map_or(f64::NAN, |t| t.significance())
}

/// Significance of a paired comparison; NaN when it cannot be computed.
pub fn paired_significance(pairs: &[(f64, f64)]) -> f64 {
    TTest::paired(pairs).map_or(f64::NAN, |t| t.significance())
}
