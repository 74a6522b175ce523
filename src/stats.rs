//! Rank statistics: average ranks, Spearman's rho and its two-sided p-value.
//!
//! The p-value uses the Student t approximation with `n - 2` degrees of
//! freedom, evaluated through the regularized incomplete beta function.

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spearman {
    pub coefficient: f64,
    pub p_value: f64,
}

/// 1-based ranks; tied values share the mean of their positions
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j are tied
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Spearman rank correlation between paired samples
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Spearman> {
    let n = x.len().min(y.len());
    if n < 3 {
        return Err(AnalysisError::InsufficientData { pairs: n });
    }
    let (x, y) = (&x[..n], &y[..n]);

    if is_constant(x) {
        return Err(AnalysisError::ConstantInput { column: "x" });
    }
    if is_constant(y) {
        return Err(AnalysisError::ConstantInput { column: "y" });
    }

    let rx = average_ranks(x);
    let ry = average_ranks(y);
    let coefficient = pearson(&rx, &ry).ok_or(AnalysisError::ConstantInput { column: "ranks" })?;

    Ok(Spearman {
        coefficient,
        p_value: two_sided_p_value(coefficient, n),
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Two-sided p-value for a correlation `r` over `n` pairs
pub fn two_sided_p_value(r: f64, n: usize) -> f64 {
    let df = n.saturating_sub(2) as f64;
    if df == 0.0 {
        return 1.0;
    }
    let denom = (1.0 - r) * (1.0 + r);
    if denom <= 0.0 {
        return 0.0;
    }
    let t2 = r * r * df / denom;
    // P(|T| > t) = I_{df / (df + t^2)}(df / 2, 1 / 2)
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t2)).clamp(0.0, 1.0)
}

// ============================================================================
// SPECIAL FUNCTIONS
// ============================================================================

/// Lanczos approximation (g = 7, n = 9)
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // reflection
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// I_x(a, b)
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // continued fraction converges fastest on this side
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Modified Lentz evaluation of the incomplete beta continued fraction
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 300;
    const EPS: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let ranks = average_ranks(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_average_ranks_all_equal() {
        let ranks = average_ranks(&[5.0, 5.0, 5.0]);
        assert_eq!(ranks, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(close(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn test_incomplete_beta_symmetric() {
        assert!(close(regularized_incomplete_beta(2.0, 2.0, 0.5), 0.5, 1e-12));
        // I_x(1, 1) = x
        assert!(close(regularized_incomplete_beta(1.0, 1.0, 0.3), 0.3, 1e-12));
    }

    #[test]
    fn test_perfect_monotonic_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [0.0, 10.0, 15.0, 40.0, 41.0, 100.0];

        let result = spearman(&x, &y).unwrap();

        assert!(close(result.coefficient, 1.0, 1e-12));
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [9.0, 7.0, 3.0, 1.0];

        let result = spearman(&x, &y).unwrap();
        assert!(close(result.coefficient, -1.0, 1e-12));
    }

    #[test]
    fn test_known_p_value() {
        // rho = 0.8 over 5 pairs: t = 0.8 * sqrt(3 / 0.36) ~ 2.3094, two-sided p ~ 0.1041
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];

        let result = spearman(&x, &y).unwrap();

        assert!(close(result.coefficient, 0.8, 1e-12));
        assert!(close(result.p_value, 0.1041, 1e-3));
    }

    #[test]
    fn test_zero_correlation_p_is_one() {
        assert!(close(two_sided_p_value(0.0, 10), 1.0, 1e-12));
    }

    #[test]
    fn test_too_few_pairs() {
        let result = spearman(&[1.0, 2.0], &[3.0, 4.0]);
        assert!(matches!(result, Err(AnalysisError::InsufficientData { pairs: 2 })));
    }

    #[test]
    fn test_constant_column() {
        let result = spearman(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]);
        assert!(matches!(result, Err(AnalysisError::ConstantInput { column: "y" })));
    }
}
