//! Two-sample hypothesis tests for ZV style distributions.
//!
//! The authorship engine compares the ZV sample anchored in one document with
//! the sample anchored in another. The Kolmogorov-Smirnov two-sample test is
//! the decision primitive: each test returns a [`TwoSampleResult`] with the
//! D statistic, a p-value (where the samples allow one), and a same/different
//! decision at the requested significance level.

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Significance level below which two samples are declared different.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Largest `n1 * n2` (exclusive) for which the exact p-value is computed.
pub const EXACT_PRODUCT_LIMIT: usize = 10_000;

/// How a p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PValueMethod {
    /// Lattice-path enumeration of the permutation distribution.
    Exact,
    /// Kolmogorov limiting distribution with Stephens' small-sample correction.
    Asymptotic,
    /// No p-value could be computed.
    None,
}

impl std::fmt::Display for PValueMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Asymptotic => write!(f, "asymptotic"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Result of a single two-sample test.
#[derive(Debug, Clone)]
pub struct TwoSampleResult {
    pub name: String,
    /// True when the null hypothesis (same distribution) cannot be rejected.
    pub same_distribution: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub method: PValueMethod,
    pub details: String,
}

impl TwoSampleResult {
    /// Decide "same distribution" from a p-value against a significance level.
    ///
    /// A missing p-value never counts as a match.
    pub fn same_from_p(p: Option<f64>, significance: f64) -> bool {
        match p {
            Some(p) => p >= significance,
            None => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Copy and sort a sample ascending under the IEEE total order, so NaNs sort
/// last (or first when negative) instead of breaking the comparator.
fn sorted(sample: &[f64]) -> Vec<f64> {
    let mut out = sample.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Return a non-matching `TwoSampleResult` when a sample is empty.
fn insufficient(name: &str, n1: usize, n2: usize) -> TwoSampleResult {
    TwoSampleResult {
        name: name.to_string(),
        same_distribution: false,
        p_value: None,
        statistic: 0.0,
        method: PValueMethod::None,
        details: format!("Insufficient data: need 1 per sample, got n1={n1}, n2={n2}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Kolmogorov-Smirnov
// ═══════════════════════════════════════════════════════════════════════════════

/// KS statistic D = sup |F1(x) - F2(x)| between two empirical distributions.
///
/// Tied values are consumed together from both samples before the CDF gap is
/// measured, so D is exact in the presence of ties. Returns 0.0 if either
/// sample is empty.
pub fn ks_statistic(x: &[f64], y: &[f64]) -> f64 {
    let a = sorted(x);
    let b = sorted(y);
    let (n1, n2) = (a.len(), b.len());
    if n1 == 0 || n2 == 0 {
        return 0.0;
    }

    let (mut i, mut j) = (0usize, 0usize);
    let mut d_max = 0.0f64;
    while i < n1 && j < n2 {
        let v = a[i].min(b[j]);
        let (i0, j0) = (i, j);
        while i < n1 && a[i] <= v {
            i += 1;
        }
        while j < n2 && b[j] <= v {
            j += 1;
        }
        // Only NaN heads are left on both sides.
        if i == i0 && j == j0 {
            break;
        }
        let gap = (i as f64 / n1 as f64 - j as f64 / n2 as f64).abs();
        d_max = d_max.max(gap);
    }
    d_max
}

/// Survival function of the Kolmogorov distribution, Q(λ) = 2 Σ (-1)^(k-1) e^(-2k²λ²).
pub fn kolmogorov_sf(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut p = 0.0;
    for k in 1..=100i32 {
        let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
        p += sign * (-2.0 * (k as f64 * lambda).powi(2)).exp();
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Exact two-sided p-value P(D >= d) under the null for sample sizes n1, n2.
///
/// Walks the (m+1) x (n+1) lattice one row at a time, keeping a single row of
/// normalised path weights; cells whose CDF gap reaches `d` are zeroed. Each
/// row is scaled by i/(i+n) so the final cell holds P(D < d) directly and no
/// binomial coefficient is ever formed.
pub fn ks_exact_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || d <= 0.0 {
        return 1.0;
    }
    let (m, n) = if n1 > n2 { (n2, n1) } else { (n1, n2) };
    let md = m as f64;
    let nd = n as f64;
    let q = (0.5 + (d * md * nd - 1e-7).floor()) / (md * nd);

    let mut u: Vec<f64> = (0..=n)
        .map(|j| if j as f64 / nd > q { 0.0 } else { 1.0 })
        .collect();
    for i in 1..=m {
        let w = i as f64 / (i + n) as f64;
        let x = i as f64 / md;
        u[0] = if x > q { 0.0 } else { w * u[0] };
        for j in 1..=n {
            u[j] = if (x - j as f64 / nd).abs() > q {
                0.0
            } else {
                w * u[j] + u[j - 1]
            };
        }
    }
    (1.0 - u[n]).clamp(0.0, 1.0)
}

/// Asymptotic two-sided p-value using the effective size sqrt(n1·n2/(n1+n2)).
pub fn ks_asymptotic_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || d <= 0.0 {
        return 1.0;
    }
    let en = ((n1 * n2) as f64 / (n1 + n2) as f64).sqrt();
    kolmogorov_sf((en + 0.12 + 0.11 / en) * d)
}

/// Kolmogorov-Smirnov two-sample test at the default 5% significance level.
pub fn ks_two_sample(x: &[f64], y: &[f64]) -> TwoSampleResult {
    ks_two_sample_at(x, y, DEFAULT_SIGNIFICANCE)
}

/// Kolmogorov-Smirnov two-sample test at an explicit significance level.
///
/// The test is symmetric: swapping `x` and `y` yields the same statistic,
/// p-value and decision.
pub fn ks_two_sample_at(x: &[f64], y: &[f64], significance: f64) -> TwoSampleResult {
    let name = "Kolmogorov-Smirnov 2-sample";
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return insufficient(name, n1, n2);
    }

    let d = ks_statistic(x, y);
    let (p, method) = if d <= 0.0 {
        (1.0, PValueMethod::Exact)
    } else if n1.saturating_mul(n2) < EXACT_PRODUCT_LIMIT {
        (ks_exact_p_value(d, n1, n2), PValueMethod::Exact)
    } else {
        (ks_asymptotic_p_value(d, n1, n2), PValueMethod::Asymptotic)
    };
    let same = TwoSampleResult::same_from_p(Some(p), significance);
    log::trace!("ks: n1={n1} n2={n2} D={d:.6} p={p:.6} ({method})");

    TwoSampleResult {
        name: name.to_string(),
        same_distribution: same,
        p_value: Some(p),
        statistic: d,
        method,
        details: format!("D={d:.6}, n1={n1}, n2={n2}, alpha={significance}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random samples in [0, 1) (simple LCG).
    fn pseudo_random(n: usize, seed: u64) -> Vec<f64> {
        let mut out = Vec::with_capacity(n);
        let mut state = seed;
        for _ in 0..n {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            out.push((state >> 11) as f64 / (1u64 << 53) as f64);
        }
        out
    }

    fn binomial(n: u64, k: u64) -> f64 {
        (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
    }

    #[test]
    fn test_nan_samples_do_not_panic() {
        let sample: Vec<f64> = (0..64)
            .map(|i| if i % 7 == 0 { f64::NAN } else { i as f64 })
            .collect();
        let s = sorted(&sample);
        assert!(s[..s.len() - 10].windows(2).all(|w| w[0] <= w[1]));
        assert!(s[s.len() - 10..].iter().all(|v| v.is_nan()));

        let d = ks_statistic(&sample, &sample);
        assert!((0.0..=1.0).contains(&d));
        let r = ks_two_sample(&sample, &[f64::NAN, 1.0]);
        assert!(r.p_value.is_some());
    }

    #[test]
    fn test_same_from_p() {
        assert!(TwoSampleResult::same_from_p(Some(0.05), 0.05));
        assert!(TwoSampleResult::same_from_p(Some(0.8), 0.05));
        assert!(!TwoSampleResult::same_from_p(Some(0.0499), 0.05));
        assert!(!TwoSampleResult::same_from_p(None, 0.05));
    }

    #[test]
    fn test_identical_samples_p_one() {
        let x = vec![0.0; 12];
        let result = ks_two_sample(&x, &x);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, Some(1.0));
        assert!(result.same_distribution);
    }

    #[test]
    fn test_statistic_handles_ties() {
        let x = [1.0, 1.0, 2.0, 2.0];
        let y = [1.0, 2.0, 2.0, 2.0];
        // F1(1)=0.5, F2(1)=0.25
        assert!((ks_statistic(&x, &y) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_statistic_disjoint_is_one() {
        let x = [0.0, 0.1, 0.2];
        let y = [1.0, 1.5];
        assert_eq!(ks_statistic(&x, &y), 1.0);
    }

    #[test]
    fn test_exact_small_cases() {
        // m = n = 1: D is always 1.
        assert!((ks_exact_p_value(1.0, 1, 1) - 1.0).abs() < 1e-12);
        // m = n = 2: 2 of the 6 orderings reach D = 1.
        assert!((ks_exact_p_value(1.0, 2, 2) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_disjoint_matches_path_count() {
        for n in [3usize, 5, 10, 20] {
            let x = vec![0.0; n];
            let y = vec![1.0; n];
            let result = ks_two_sample(&x, &y);
            let expected = 2.0 / binomial(2 * n as u64, n as u64);
            let p = result.p_value.unwrap();
            assert!(
                (p - expected).abs() < 1e-12,
                "n={n}: p={p}, expected={expected}"
            );
            assert_eq!(result.same_distribution, expected >= DEFAULT_SIGNIFICANCE);
            assert_eq!(result.method, PValueMethod::Exact);
        }
    }

    #[test]
    fn test_symmetry() {
        let x = pseudo_random(40, 1);
        let y: Vec<f64> = pseudo_random(25, 2).iter().map(|v| v * 1.3).collect();
        let a = ks_two_sample(&x, &y);
        let b = ks_two_sample(&y, &x);
        assert_eq!(a.statistic, b.statistic);
        assert_eq!(a.p_value, b.p_value);
        assert_eq!(a.same_distribution, b.same_distribution);
    }

    #[test]
    fn test_same_process_matches() {
        let x = pseudo_random(60, 7);
        let y = pseudo_random(60, 99);
        let result = ks_two_sample(&x, &y);
        assert!(
            result.same_distribution,
            "uniform vs uniform rejected: {}",
            result.details
        );
    }

    #[test]
    fn test_shifted_process_rejected() {
        let x = pseudo_random(60, 7);
        let y: Vec<f64> = pseudo_random(60, 99).iter().map(|v| v + 0.5).collect();
        let result = ks_two_sample(&x, &y);
        assert!(!result.same_distribution, "shift not detected: {}", result.details);
    }

    #[test]
    fn test_large_samples_use_asymptotic() {
        let x = pseudo_random(200, 3);
        let y = pseudo_random(200, 4);
        let result = ks_two_sample(&x, &y);
        assert_eq!(result.method, PValueMethod::Asymptotic);
        let p = result.p_value.unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_exact_and_asymptotic_agree_roughly() {
        let d = 0.3;
        let exact = ks_exact_p_value(d, 60, 60);
        let asym = ks_asymptotic_p_value(d, 60, 60);
        assert!((exact - asym).abs() < 0.02, "exact={exact}, asym={asym}");
    }

    #[test]
    fn test_kolmogorov_sf_bounds() {
        assert_eq!(kolmogorov_sf(0.0), 1.0);
        assert!(kolmogorov_sf(3.0) < 1e-6);
        // Critical value at 5%
        assert!((kolmogorov_sf(1.358) - 0.05).abs() < 0.002);
    }

    #[test]
    fn test_empty_sample_insufficient() {
        let result = ks_two_sample(&[], &[1.0, 2.0]);
        assert!(!result.same_distribution);
        assert!(result.p_value.is_none());
        assert_eq!(result.method, PValueMethod::None);
        assert!(result.details.contains("Insufficient"));
    }

    #[test]
    fn test_significance_level_changes_decision() {
        let x = [0.0, 0.0, 0.0, 0.0];
        let y = [0.0, 0.0, 1.0, 1.0];
        let loose = ks_two_sample_at(&x, &y, 0.01);
        let strict = ks_two_sample_at(&x, &y, 0.99);
        assert_eq!(loose.p_value, strict.p_value);
        assert!(loose.same_distribution);
        assert!(!strict.same_distribution);
    }
}
