use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Result, bail};
use serde::Serialize;
use stylochron_core::{AnalysisConfig, Document, determine_with};

use super::{AnalysisOptions, format_confidence, write_json};
use crate::corpus::Corpus;

#[derive(Serialize)]
struct DetermineReport<'a> {
    unknown: usize,
    expected_author: &'a str,
    attributed_author: Option<&'a str>,
    /// Corpus index of the attributed document.
    attributed_index: Option<usize>,
    stopped_early: bool,
    config: AnalysisConfig,
    /// Best confidence per corpus index.
    scores: BTreeMap<usize, f64>,
}

pub fn run(corpus_path: &str, unknown: usize, options: &AnalysisOptions) -> Result<()> {
    let config = options.resolve()?;
    let corpus = Corpus::load(Path::new(corpus_path))?;
    let target = corpus.entry(unknown)?;
    if corpus.len() < 2 {
        bail!("corpus needs at least one candidate besides document {unknown}");
    }

    let others: Vec<usize> = (0..corpus.len()).filter(|&i| i != unknown).collect();
    let candidates: Vec<Document> = others
        .iter()
        .map(|&i| corpus.documents[i].chunks.clone())
        .collect();
    let authors: Vec<String> = others
        .iter()
        .map(|&i| corpus.documents[i].author.clone())
        .collect();

    println!(
        "Attributing document {unknown} ({} chunks) against {} candidates (metric={})",
        target.chunks.len(),
        candidates.len(),
        config.metric
    );

    let result = determine_with(&target.chunks, &candidates, &authors, &config, &config.metric)?;

    // Candidate positions back to corpus indices.
    let scores: BTreeMap<usize, f64> = result
        .scores
        .iter()
        .map(|(&k, &score)| (others[k], score))
        .collect();

    println!("\n{:<6} {:<24} {:>10}", "Index", "Author", "Score");
    println!("{}", "-".repeat(42));
    for (&index, &score) in &scores {
        let marker = if result.best_candidate.map(|k| others[k]) == Some(index) {
            " ←"
        } else {
            ""
        };
        println!(
            "{index:<6} {:<24} {:>10}{marker}",
            corpus.documents[index].author,
            format_confidence(score)
        );
    }

    match result.author {
        Some(author) => println!(
            "\n  Attributed to: {author} (expected {}){}",
            target.author,
            if result.stopped_early { " [early stop]" } else { "" }
        ),
        None => println!("\n  No author found (expected {})", target.author),
    }

    if let Some(path) = &options.output_path {
        write_json(
            path,
            &DetermineReport {
                unknown,
                expected_author: &target.author,
                attributed_author: result.author.map(String::as_str),
                attributed_index: result.best_candidate.map(|k| others[k]),
                stopped_early: result.stopped_early,
                config,
                scores,
            },
        )?;
    }
    Ok(())
}
