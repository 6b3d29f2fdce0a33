//! Corpus-wide author attribution.
//!
//! Every candidate document is verified against the unknown document once
//! per outer window size, with the inner verification sweep starting at that
//! window. A candidate's score is the best confidence of any positive match;
//! reaching the stop confidence ends the search immediately.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{AnalysisConfig, SweepConfig};
use crate::distance::DistanceMetric;
use crate::document::Document;
use crate::error::{EngineError, Result};
use crate::verification::verify_with;

/// Result of attributing one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Determination<'a, A> {
    /// Author of the best-scoring candidate, or `None` when no candidate ever
    /// matched.
    pub author: Option<&'a A>,
    pub best_candidate: Option<usize>,
    /// Best confirmed confidence per candidate index; 0 if never matched.
    pub scores: BTreeMap<usize, f64>,
    /// The search ended early on a near-certain match.
    pub stopped_early: bool,
}

impl<A> Determination<'_, A> {
    /// Score of the attributed candidate, 0 when none was attributed.
    pub fn best_score(&self) -> f64 {
        self.best_candidate
            .and_then(|i| self.scores.get(&i).copied())
            .unwrap_or(0.0)
    }
}

/// Score map plus early-stop flag produced by the candidate search.
pub(crate) struct CandidateScores {
    pub scores: BTreeMap<usize, f64>,
    pub stopped_early: bool,
}

/// Run the nested window/candidate search.
pub(crate) fn score_candidates<M>(
    document: &Document,
    candidates: &[&Document],
    config: &AnalysisConfig,
    metric: &M,
) -> Result<CandidateScores>
where
    M: DistanceMetric + ?Sized,
{
    let mut scores: BTreeMap<usize, f64> = (0..candidates.len()).map(|i| (i, 0.0)).collect();

    for time in config.sweep.windows() {
        let inner = AnalysisConfig {
            sweep: config.sweep.starting_at(time),
            ..*config
        };
        for (index, candidate) in candidates.iter().enumerate() {
            let verification = verify_with(candidate, document, &inner, metric)?;
            if !verification.matched {
                continue;
            }

            let score = scores.entry(index).or_insert(0.0);
            *score = score.max(verification.confidence);
            log::debug!(
                "determine: window={time} candidate={index} confidence={:.6} score={:.6}",
                verification.confidence,
                *score
            );
            if verification.confidence >= config.stop_confidence {
                log::info!(
                    "determine: candidate {index} reached {:.4} >= {:.4} at window {time}, stopping",
                    verification.confidence,
                    config.stop_confidence
                );
                return Ok(CandidateScores {
                    scores,
                    stopped_early: true,
                });
            }
        }
    }

    Ok(CandidateScores {
        scores,
        stopped_early: false,
    })
}

/// Highest-scoring candidate, lowest index on ties; `None` if every score is 0.
pub(crate) fn select_best(scores: &BTreeMap<usize, f64>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (&index, &score) in scores {
        match best {
            Some((_, top)) if top >= score => {}
            _ => best = Some((index, score)),
        }
    }
    best.filter(|(_, score)| *score > 0.0)
}

/// Attribute `document` with the default thresholds over `sweep`.
pub fn determine<'a, A, M>(
    document: &Document,
    candidates: &[Document],
    authors: &'a [A],
    sweep: SweepConfig,
    metric: &M,
) -> Result<Determination<'a, A>>
where
    M: DistanceMetric + ?Sized,
{
    let config = AnalysisConfig::default().with_sweep(sweep);
    determine_with(document, candidates, authors, &config, metric)
}

/// Attribute `document` to one of `authors`, whose entries pair up with
/// `candidates` by index.
pub fn determine_with<'a, A, M>(
    document: &Document,
    candidates: &[Document],
    authors: &'a [A],
    config: &AnalysisConfig,
    metric: &M,
) -> Result<Determination<'a, A>>
where
    M: DistanceMetric + ?Sized,
{
    config.validate()?;
    if candidates.len() != authors.len() {
        return Err(EngineError::CorpusMismatch {
            documents: candidates.len(),
            authors: authors.len(),
        });
    }
    if candidates.is_empty() {
        log::warn!("determine: empty candidate corpus, no author can be attributed");
        return Ok(Determination {
            author: None,
            best_candidate: None,
            scores: BTreeMap::new(),
            stopped_early: false,
        });
    }

    let refs: Vec<&Document> = candidates.iter().collect();
    let CandidateScores {
        scores,
        stopped_early,
    } = score_candidates(document, &refs, config, metric)?;

    let best_candidate = select_best(&scores).map(|(index, _)| index);
    match best_candidate {
        Some(index) => log::info!(
            "determine: attributed to candidate {index} (score {:.4})",
            scores.get(&index).copied().unwrap_or(0.0)
        ),
        None => log::info!("determine: no candidate matched, no author found"),
    }

    Ok(Determination {
        author: best_candidate.and_then(|index| authors.get(index)),
        best_candidate,
        scores,
        stopped_early,
    })
}
