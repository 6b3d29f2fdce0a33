//! Pairwise author verification.
//!
//! For each window size of the sweep, the ZV samples of both documents are
//! compared with the KS two-sample test. The first window at which the test
//! cannot reject "same distribution" decides the pair as same-author; if no
//! window does, the best p-value seen is reported instead.

use serde::Serialize;

use crate::config::{AnalysisConfig, SweepConfig};
use crate::distance::DistanceMetric;
use crate::document::{Document, MergedSequence};
use crate::error::{EngineError, Result};
use crate::zv::build_samples;

/// Confidence reported when no window of the sweep could be evaluated.
pub const NOT_EVALUATED: f64 = -1.0;

/// Outcome of verifying one document pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verification {
    pub matched: bool,
    /// p-value of the matching window, or the best p-value seen, or
    /// [`NOT_EVALUATED`].
    pub confidence: f64,
    /// Window size at which the match was found.
    pub window: Option<usize>,
    /// Number of windows actually tested.
    pub steps: usize,
}

impl Verification {
    /// At least one window was tested.
    pub fn evaluated(&self) -> bool {
        self.steps > 0
    }
}

/// Run the KS two-sample test and return `(same_distribution, p_value)`.
pub fn two_sample_test(first: &[f64], second: &[f64], significance: f64) -> Result<(bool, f64)> {
    let result = stylochron_tests::ks_two_sample_at(first, second, significance);
    let p = result.p_value.ok_or(EngineError::EmptySample)?;
    Ok((result.same_distribution, p))
}

/// Verify a pair with the default significance level over `sweep`.
pub fn verify<M>(first: &Document, second: &Document, sweep: SweepConfig, metric: &M) -> Result<Verification>
where
    M: DistanceMetric + ?Sized,
{
    let config = AnalysisConfig::default().with_sweep(sweep);
    verify_with(first, second, &config, metric)
}

/// Verify a pair under an explicit configuration.
///
/// The sweep stops early, without a match, once the window reaches the
/// length of `first` or either ZV sample comes back empty.
pub fn verify_with<M>(
    first: &Document,
    second: &Document,
    config: &AnalysisConfig,
    metric: &M,
) -> Result<Verification>
where
    M: DistanceMetric + ?Sized,
{
    config.validate()?;
    let merged = MergedSequence::new(first, second)?;

    let mut best = NOT_EVALUATED;
    let mut steps = 0usize;
    for time in config.sweep.windows() {
        if time >= first.len() {
            log::debug!(
                "verify[{}]: window {time} exceeds first document ({} chunks), stopping",
                metric.name(),
                first.len()
            );
            break;
        }

        let samples = build_samples(&merged, time, metric)?;
        if !samples.is_evaluable() {
            log::debug!(
                "verify[{}]: window {time} leaves an empty sample ({} / {}), stopping",
                metric.name(),
                samples.first.len(),
                samples.second.len()
            );
            break;
        }

        let (same, p) = two_sample_test(&samples.first, &samples.second, config.significance_level)?;
        steps += 1;
        log::debug!(
            "verify[{}]: window={time} n1={} n2={} p={p:.6} same={same}",
            metric.name(),
            samples.first.len(),
            samples.second.len()
        );

        if same {
            return Ok(Verification {
                matched: true,
                confidence: p,
                window: Some(time),
                steps,
            });
        }
        best = best.max(p);
    }

    Ok(Verification {
        matched: false,
        confidence: best,
        window: None,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{Metric, euclidean};

    fn alternating(len: usize, a: &[f64], b: &[f64]) -> Document {
        Document::from_rows(
            (0..len)
                .map(|i| if i % 2 == 0 { a.to_vec() } else { b.to_vec() })
                .collect(),
        )
        .unwrap()
    }

    fn constant(len: usize, v: &[f64]) -> Document {
        Document::from_rows(vec![v.to_vec(); len]).unwrap()
    }

    #[test]
    fn test_split_sequence_matches_at_window_one() {
        let whole = alternating(40, &[1.0, 0.0], &[0.0, 1.0]);
        let (left, right) = whole.chunks().split_at(20);
        let a = Document::new(left.to_vec()).unwrap();
        let b = Document::new(right.to_vec()).unwrap();

        let result = verify(&a, &b, SweepConfig::new(1, 2, 1), &Metric::Canberra).unwrap();
        assert!(result.matched);
        assert!(result.confidence >= 0.05);
        assert_eq!(result.window, Some(1));
    }

    #[test]
    fn test_start_beyond_first_document_not_evaluated() {
        let a = constant(5, &[1.0]);
        let b = constant(5, &[1.0]);
        let result = verify(&a, &b, SweepConfig::new(5, 10, 1), &euclidean).unwrap();
        assert!(!result.matched);
        assert_eq!(result.confidence, NOT_EVALUATED);
        assert!(!result.evaluated());
    }

    #[test]
    fn test_empty_sample_stops_sweep() {
        // time = len(A) - 1 leaves sample one empty
        let a = constant(4, &[1.0]);
        let b = constant(6, &[1.0]);
        let result = verify(&a, &b, SweepConfig::new(3, 4, 1), &euclidean).unwrap();
        assert_eq!(result.steps, 0);
        assert_eq!(result.confidence, NOT_EVALUATED);

        // second document of one chunk has no sample either
        let b = constant(1, &[1.0]);
        let result = verify(&a, &b, SweepConfig::new(1, 3, 1), &euclidean).unwrap();
        assert_eq!(result.steps, 0);
    }

    #[test]
    fn test_different_styles_keep_best_p_value() {
        let a = constant(30, &[1.0, 1.0]);
        let b = alternating(30, &[1.0, 0.0], &[0.0, 1.0]);
        let result = verify(&a, &b, SweepConfig::new(2, 5, 1), &Metric::Canberra).unwrap();
        assert!(!result.matched);
        assert_eq!(result.steps, 3);
        assert!(result.confidence >= 0.0 && result.confidence < 0.05);
    }

    #[test]
    fn test_first_match_wins() {
        let a = alternating(30, &[1.0, 0.0], &[0.0, 1.0]);
        let b = alternating(30, &[1.0, 0.0], &[0.0, 1.0]);
        let result = verify(&a, &b, SweepConfig::new(2, 10, 1), &Metric::Canberra).unwrap();
        assert!(result.matched);
        assert_eq!(result.window, Some(2));
        assert_eq!(result.steps, 1);
    }

    #[test]
    fn test_invalid_sweep_rejected() {
        let a = constant(10, &[1.0]);
        assert!(matches!(
            verify(&a, &a, SweepConfig::new(0, 5, 1), &euclidean),
            Err(EngineError::InvalidSweep(_))
        ));
        assert!(matches!(
            verify(&a, &a, SweepConfig::new(1, 5, 0), &euclidean),
            Err(EngineError::InvalidSweep(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_hard_failure() {
        let a = constant(10, &[1.0, 2.0]);
        let b = constant(10, &[1.0]);
        assert_eq!(
            verify(&a, &b, SweepConfig::new(1, 5, 1), &euclidean).unwrap_err(),
            EngineError::DimensionMismatch { left: 2, right: 1 }
        );
    }

    #[test]
    fn test_spearman_degenerate_surfaces() {
        // One nonzero dimension per chunk: correlation undefined.
        let a = alternating(10, &[1.0, 0.0], &[0.0, 1.0]);
        let err = verify(&a, &a, SweepConfig::new(2, 3, 1), &Metric::Spearman).unwrap_err();
        assert!(matches!(err, EngineError::UndefinedCorrelation { .. }));
    }

    #[test]
    fn test_two_sample_test_symmetric() {
        let x = [0.1, 0.4, 0.35, 0.8, 0.2];
        let y = [0.5, 0.9, 0.7, 0.65];
        assert_eq!(two_sample_test(&x, &y, 0.05).unwrap(), two_sample_test(&y, &x, 0.05).unwrap());
        assert_eq!(two_sample_test(&[], &y, 0.05).unwrap_err(), EngineError::EmptySample);
    }
}
