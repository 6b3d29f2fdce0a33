//! Chunk distance metrics.
//!
//! A metric is any pure function from two equal-length vectors to a
//! nonnegative dissimilarity. Three are built in ([`Metric`]); anything that
//! implements [`DistanceMetric`] can be injected instead, including a plain
//! `fn` or closure with the right signature.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, RankTieBreaker, Statistics};

use crate::document::Chunk;
use crate::error::{EngineError, Result};

/// Scalar dissimilarity between two equal-length vectors.
pub trait DistanceMetric {
    fn distance(&self, p: &[f64], q: &[f64]) -> Result<f64>;

    /// Short name used in logs and reports.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> DistanceMetric for F
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    fn distance(&self, p: &[f64], q: &[f64]) -> Result<f64> {
        self(p, q)
    }
}

/// Built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Sum of |p-q| / (|p|+|q|), skipping 0/0 terms. The default.
    #[default]
    Canberra,
    /// L2 distance.
    Euclidean,
    /// 1 - Spearman rank correlation over the dimensions where `q` is nonzero.
    Spearman,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Canberra, Metric::Euclidean, Metric::Spearman];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canberra => "canberra",
            Self::Euclidean => "euclidean",
            Self::Spearman => "spearman",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "canberra" => Ok(Self::Canberra),
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "spearman" => Ok(Self::Spearman),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown metric '{other}' (expected canberra, euclidean or spearman)"
            ))),
        }
    }
}

impl DistanceMetric for Metric {
    fn distance(&self, p: &[f64], q: &[f64]) -> Result<f64> {
        match self {
            Self::Canberra => canberra(p, q),
            Self::Euclidean => euclidean(p, q),
            Self::Spearman => spearman(p, q),
        }
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

fn check_dimensions(p: &[f64], q: &[f64]) -> Result<()> {
    if p.len() != q.len() {
        return Err(EngineError::DimensionMismatch {
            left: p.len(),
            right: q.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Canberra distance. Terms where both coordinates are zero contribute 0.
pub fn canberra(p: &[f64], q: &[f64]) -> Result<f64> {
    check_dimensions(p, q)?;
    Ok(p.iter()
        .zip(q)
        .map(|(x, y)| {
            let denom = x.abs() + y.abs();
            if denom == 0.0 {
                0.0
            } else {
                (x - y).abs() / denom
            }
        })
        .sum())
}

/// Euclidean (L2) distance.
pub fn euclidean(p: &[f64], q: &[f64]) -> Result<f64> {
    check_dimensions(p, q)?;
    let sum: f64 = p
        .iter()
        .zip(q)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum();
    Ok(sum.sqrt())
}

/// Spearman rank distance, `1 - rho`, restricted to dimensions where `q != 0`.
///
/// Ties receive their average rank. Fewer than two usable dimensions, or a
/// masked vector whose ranks are all equal, leave the correlation undefined
/// and are reported as errors rather than NaN.
pub fn spearman(p: &[f64], q: &[f64]) -> Result<f64> {
    check_dimensions(p, q)?;
    let (a, b): (Vec<f64>, Vec<f64>) = p
        .iter()
        .zip(q)
        .filter(|(_, y)| **y != 0.0)
        .map(|(x, y)| (*x, *y))
        .unzip();
    if a.len() < 2 {
        return Err(EngineError::UndefinedCorrelation { nonzero: a.len() });
    }

    let ranks_a = Data::new(a).ranks(RankTieBreaker::Average);
    let ranks_b = Data::new(b).ranks(RankTieBreaker::Average);
    let sd_a = ranks_a.iter().std_dev();
    let sd_b = ranks_b.iter().std_dev();
    if sd_a < 1e-12 || sd_b < 1e-12 {
        return Err(EngineError::ConstantRanks);
    }

    let rho = ranks_a.iter().covariance(ranks_b.iter()) / (sd_a * sd_b);
    Ok(1.0 - rho.clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Chunk distance
// ---------------------------------------------------------------------------

/// Distance between two chunks under `metric`.
///
/// Dimensionality is checked before the metric runs, so a custom metric never
/// sees mismatched input.
pub fn chunk_distance<M>(a: &Chunk, b: &Chunk, metric: &M) -> Result<f64>
where
    M: DistanceMetric + ?Sized,
{
    if a.dimension() != b.dimension() {
        return Err(EngineError::DimensionMismatch {
            left: a.dimension(),
            right: b.dimension(),
        });
    }
    metric.distance(a.as_slice(), b.as_slice())
}
