//! Descriptive statistics over `f64` samples.
//!
//! Semantics match conventional "describe" output:
//! - `std` is the sample standard deviation (Bessel's correction, n-1)
//! - quantiles use linear interpolation between order statistics
//! - callers pass only non-null observations; an empty sample yields `None`
//!   so a no-data group can be reported explicitly rather than as a zero

use crate::domain::{Describe, PeriodStats};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation. Undefined for fewer than two observations.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile `q` in `[0, 1]` of a **sorted** sample, by linear interpolation.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(values);
    quantile_sorted(&sorted, 0.5)
}

/// Full eight-number summary over a sample of non-null observations.
pub fn describe(values: &[f64]) -> Option<Describe> {
    let sorted = sorted_copy(values);
    if sorted.is_empty() {
        return None;
    }
    Some(Describe {
        count: sorted.len(),
        mean: mean(&sorted)?,
        std: sample_std(&sorted),
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25)?,
        median: quantile_sorted(&sorted, 0.5)?,
        q75: quantile_sorted(&sorted, 0.75)?,
        max: sorted[sorted.len() - 1],
    })
}

/// The five comparison statistics used by the period/quarter tables.
pub fn period_stats(values: &[f64]) -> Option<PeriodStats> {
    let sorted = sorted_copy(values);
    if sorted.is_empty() {
        return None;
    }
    Some(PeriodStats {
        count: sorted.len(),
        mean: mean(&sorted)?,
        median: quantile_sorted(&sorted, 0.5)?,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        std: sample_std(&sorted),
    })
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_basic() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((mean(&v).unwrap() - 2.5).abs() < 1e-12);
        // Sample variance of 1..4 is 5/3.
        let expected = (5.0f64 / 3.0).sqrt();
        assert!((sample_std(&v).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn std_undefined_for_single_observation() {
        assert!(sample_std(&[42.0]).is_none());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile_sorted(&v, 0.25).unwrap() - 1.75).abs() < 1e-12);
        assert!((quantile_sorted(&v, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert!((quantile_sorted(&v, 0.75).unwrap() - 3.25).abs() < 1e-12);
    }

    #[test]
    fn describe_matches_known_vector() {
        let v = [10.0, 20.0, 30.0, 40.0, 50.0];
        let d = describe(&v).unwrap();
        assert_eq!(d.count, 5);
        assert!((d.mean - 30.0).abs() < 1e-12);
        assert!((d.min - 10.0).abs() < 1e-12);
        assert!((d.q25 - 20.0).abs() < 1e-12);
        assert!((d.median - 30.0).abs() < 1e-12);
        assert!((d.q75 - 40.0).abs() < 1e-12);
        assert!((d.max - 50.0).abs() < 1e-12);
    }

    #[test]
    fn empty_sample_is_explicit_no_data() {
        assert!(describe(&[]).is_none());
        assert!(period_stats(&[]).is_none());
    }

    #[test]
    fn negative_prices_are_ordinary_observations() {
        let v = [-1000.0, 100.0, 200.0];
        let d = describe(&v).unwrap();
        assert!((d.min - -1000.0).abs() < 1e-12);
        assert!((d.mean - (-700.0 / 3.0)).abs() < 1e-9);
    }
}
