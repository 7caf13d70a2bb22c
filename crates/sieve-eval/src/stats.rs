//! Aggregate statistics over daily series.
//!
//! Every function skips non-finite inputs and returns NaN when nothing
//! defined is left to aggregate.

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|x| x.is_finite()).collect()
}

/// Arithmetic mean of the finite values.
pub fn mean(values: &[f64]) -> f64 {
    let valid = finite(values);
    if valid.is_empty() {
        return f64::NAN;
    }
    valid.iter().sum::<f64>() / valid.len() as f64
}

/// Sample standard deviation (`ddof = 1`) of the finite values.
///
/// Exactly zero when all values are equal, NaN with fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let valid = finite(values);
    if valid.len() < 2 {
        return f64::NAN;
    }
    let first = valid[0];
    if valid.iter().all(|x| *x == first) {
        return 0.0;
    }
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let variance =
        valid.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (valid.len() - 1) as f64;
    variance.sqrt()
}

/// Compounded return scaled to a year: `(∏(1 + r))^(periods / T) − 1`.
pub fn annualized_return(returns: &[f64], periods_per_year: usize) -> f64 {
    let valid = finite(returns);
    if valid.is_empty() {
        return f64::NAN;
    }
    let growth: f64 = valid.iter().map(|r| 1.0 + r).product();
    growth.powf(periods_per_year as f64 / valid.len() as f64) - 1.0
}

/// Annualized Sharpe ratio `mean / std × sqrt(periods)`.
///
/// NaN for fewer than two returns or a zero standard deviation.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: usize) -> f64 {
    let std = sample_std(returns);
    if !std.is_finite() || std == 0.0 {
        return f64::NAN;
    }
    mean(returns) / std * (periods_per_year as f64).sqrt()
}

/// `mean / std`, NaN when the standard deviation is zero or undefined.
pub fn information_ratio(mean: f64, std: f64) -> f64 {
    if !std.is_finite() || std == 0.0 {
        return f64::NAN;
    }
    mean / std
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_sample_std() {
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(std, (5.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[rstest]
    #[case::constant(vec![0.01, 0.01, 0.01, 0.01])]
    #[case::single(vec![0.01])]
    #[case::empty(vec![])]
    #[case::all_nan(vec![f64::NAN, f64::NAN])]
    #[case::zeros(vec![0.0, 0.0, 0.0])]
    fn test_sharpe_undefined(#[case] returns: Vec<f64>) {
        assert!(sharpe_ratio(&returns, 252).is_nan());
    }

    #[test]
    fn test_sharpe_scales_with_sqrt_periods() {
        let returns = [0.01, -0.005, 0.015, 0.002, -0.003];
        let ratio = sharpe_ratio(&returns, 252) / sharpe_ratio(&returns, 12);
        assert_relative_eq!(ratio, (252.0_f64 / 12.0).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_sharpe_skips_nan() {
        let with_nan = sharpe_ratio(&[0.01, f64::NAN, 0.015, -0.003], 252);
        let without = sharpe_ratio(&[0.01, 0.015, -0.003], 252);
        assert_relative_eq!(with_nan, without);
    }

    #[rstest]
    #[case(0.001, 10)]
    #[case(-0.002, 63)]
    #[case(0.0005, 252)]
    fn test_constant_return_annualizes(#[case] c: f64, #[case] days: usize) {
        let returns = vec![c; days];
        let expected = (1.0 + c).powf(252.0 / days as f64) - 1.0;
        assert_relative_eq!(annualized_return(&returns, 252), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_returns_annualize_to_zero() {
        assert_eq!(annualized_return(&[0.0; 20], 252), 0.0);
    }

    #[test]
    fn test_empty_aggregates_are_nan() {
        assert!(annualized_return(&[], 252).is_nan());
        assert!(mean(&[]).is_nan());
        assert!(information_ratio(0.1, f64::NAN).is_nan());
        assert!(information_ratio(0.1, 0.0).is_nan());
    }
}
