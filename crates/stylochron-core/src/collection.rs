//! Whole-corpus runs: the all-pairs verification matrix and leave-one-out
//! attribution, plus a summary of both.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::determination::{CandidateScores, score_candidates, select_best};
use crate::distance::DistanceMetric;
use crate::document::Document;
use crate::error::{EngineError, Result};
use crate::verification::verify_with;

/// One cell of the verification matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairVerification {
    pub first: usize,
    pub second: usize,
    pub matched: bool,
    pub confidence: f64,
}

/// Attribution of one held-out document against the rest of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveOneOut<'a, A> {
    pub index: usize,
    pub expected: &'a A,
    pub attributed: Option<&'a A>,
    /// Corpus index of the attributed candidate.
    pub attributed_index: Option<usize>,
    pub best_score: f64,
    pub correct: bool,
    /// Scores keyed by corpus index; the held-out document has no entry.
    pub scores: BTreeMap<usize, f64>,
}

/// Counts and accuracy over a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub documents: usize,
    pub pairs: usize,
    pub matched_pairs: usize,
    pub determinations: usize,
    pub correct: usize,
    pub undetermined: usize,
    /// `correct / determinations`, 0 when nothing was determined.
    pub accuracy: f64,
}

impl CollectionSummary {
    pub fn from_results<A>(documents: usize, pairs: &[PairVerification], loo: &[LeaveOneOut<'_, A>]) -> Self {
        let correct = loo.iter().filter(|r| r.correct).count();
        let accuracy = if loo.is_empty() {
            0.0
        } else {
            correct as f64 / loo.len() as f64
        };
        Self {
            documents,
            pairs: pairs.len(),
            matched_pairs: pairs.iter().filter(|p| p.matched).count(),
            determinations: loo.len(),
            correct,
            undetermined: loo.iter().filter(|r| r.attributed.is_none()).count(),
            accuracy,
        }
    }
}

/// Full collection report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport<'a, A> {
    /// Name of the metric the run actually used.
    pub metric: String,
    pub config: AnalysisConfig,
    pub pairs: Vec<PairVerification>,
    pub determinations: Vec<LeaveOneOut<'a, A>>,
    pub summary: CollectionSummary,
}

/// Verify every ordered pair (i, j), row-major, including i == j.
pub fn verify_all_pairs<M>(
    documents: &[Document],
    config: &AnalysisConfig,
    metric: &M,
) -> Result<Vec<PairVerification>>
where
    M: DistanceMetric + ?Sized,
{
    config.validate()?;
    let mut pairs = Vec::with_capacity(documents.len() * documents.len());
    for (first, a) in documents.iter().enumerate() {
        for (second, b) in documents.iter().enumerate() {
            let v = verify_with(a, b, config, metric)?;
            if !v.evaluated() {
                log::warn!("verify_all_pairs: pair ({first}, {second}) never evaluated, documents too short for the sweep");
            }
            pairs.push(PairVerification {
                first,
                second,
                matched: v.matched,
                confidence: v.confidence,
            });
        }
    }
    Ok(pairs)
}

/// Attribute each document against all the others.
pub fn determine_leave_one_out<'a, A, M>(
    documents: &[Document],
    authors: &'a [A],
    config: &AnalysisConfig,
    metric: &M,
) -> Result<Vec<LeaveOneOut<'a, A>>>
where
    A: PartialEq,
    M: DistanceMetric + ?Sized,
{
    config.validate()?;
    if documents.len() != authors.len() {
        return Err(EngineError::CorpusMismatch {
            documents: documents.len(),
            authors: authors.len(),
        });
    }

    let mut results = Vec::with_capacity(documents.len());
    for (index, (document, expected)) in documents.iter().zip(authors).enumerate() {
        // Reduced position k maps back to corpus index k, or k + 1 past the
        // held-out document.
        let others: Vec<usize> = (0..documents.len()).filter(|&k| k != index).collect();
        let candidates: Vec<&Document> = others.iter().map(|&k| &documents[k]).collect();

        let CandidateScores { scores, .. } = score_candidates(document, &candidates, config, metric)?;
        let best = select_best(&scores).map(|(k, score)| (others[k], score));

        let attributed_index = best.map(|(k, _)| k);
        let attributed = attributed_index.and_then(|k| authors.get(k));
        let correct = attributed == Some(expected);
        log::info!(
            "leave-one-out: document {index} -> {} (correct={correct})",
            attributed_index.map_or_else(|| "none".to_string(), |k| format!("candidate {k}"))
        );

        results.push(LeaveOneOut {
            index,
            expected,
            attributed,
            attributed_index,
            best_score: best.map_or(0.0, |(_, score)| score),
            correct,
            scores: scores.into_iter().map(|(k, s)| (others[k], s)).collect(),
        });
    }
    Ok(results)
}

/// Run both collection passes and summarise them.
pub fn run_collection<'a, A, M>(
    documents: &[Document],
    authors: &'a [A],
    config: &AnalysisConfig,
    metric: &M,
) -> Result<CollectionReport<'a, A>>
where
    A: PartialEq,
    M: DistanceMetric + ?Sized,
{
    let pairs = verify_all_pairs(documents, config, metric)?;
    let determinations = determine_leave_one_out(documents, authors, config, metric)?;
    let summary = CollectionSummary::from_results(documents.len(), &pairs, &determinations);
    log::info!(
        "collection: {}/{} pairs matched, accuracy {:.3} over {} documents",
        summary.matched_pairs,
        summary.pairs,
        summary.accuracy,
        summary.documents
    );
    Ok(CollectionReport {
        metric: metric.name().to_string(),
        config: *config,
        pairs,
        determinations,
        summary,
    })
}
