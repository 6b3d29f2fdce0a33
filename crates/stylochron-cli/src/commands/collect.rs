use std::path::Path;

use anyhow::{Result, bail};
use stylochron_core::{
    CollectionReport, CollectionSummary, PairVerification, determine_leave_one_out,
    verify_all_pairs,
};

use super::{AnalysisOptions, format_confidence, write_json};
use crate::corpus::Corpus;

pub fn run(corpus_path: &str, include_pairs: bool, options: &AnalysisOptions) -> Result<()> {
    let config = options.resolve()?;
    let corpus = Corpus::load(Path::new(corpus_path))?;
    if corpus.is_empty() {
        bail!("corpus {corpus_path} has no documents");
    }
    let (documents, authors) = corpus.split();

    println!(
        "Collection run over {} documents (metric={}, windows {}..{} step {})",
        documents.len(),
        config.metric,
        config.sweep.start,
        config.sweep.end,
        config.sweep.step
    );

    let pairs = if include_pairs {
        verify_all_pairs(&documents, &config, &config.metric)?
    } else {
        Vec::new()
    };
    if include_pairs {
        print_matrix(documents.len(), &pairs);
    }

    let determinations = determine_leave_one_out(&documents, &authors, &config, &config.metric)?;
    println!("\nLeave-one-out attribution");
    println!("{:<6} {:<20} {:<20} {:>10} {:>8}", "Index", "Expected", "Attributed", "Score", "Correct");
    println!("{}", "-".repeat(68));
    for d in &determinations {
        println!(
            "{:<6} {:<20} {:<20} {:>10} {:>8}",
            d.index,
            d.expected,
            d.attributed.map_or("(none)", String::as_str),
            format_confidence(d.best_score),
            if d.correct { "yes" } else { "no" }
        );
    }

    let summary = CollectionSummary::from_results(documents.len(), &pairs, &determinations);
    println!(
        "\n  Accuracy: {}/{} ({:.1}%), undetermined: {}",
        summary.correct,
        summary.determinations,
        summary.accuracy * 100.0,
        summary.undetermined
    );
    if include_pairs {
        println!("  Matched pairs: {}/{}", summary.matched_pairs, summary.pairs);
    }

    if let Some(path) = &options.output_path {
        write_json(
            path,
            &CollectionReport {
                metric: config.metric.to_string(),
                config,
                pairs,
                determinations,
                summary,
            },
        )?;
    }
    Ok(())
}

/// Row i, column j: "+" when document j verifies as written by the author of
/// document i, "." otherwise.
fn print_matrix(n: usize, pairs: &[PairVerification]) {
    println!("\nVerification matrix (+ = same author)");
    let header: String = (0..n).map(|j| format!("{:>4}", j)).collect();
    println!("      {header}");
    for row in pairs.chunks(n.max(1)) {
        let Some(first) = row.first() else { continue };
        let cells: String = row
            .iter()
            .map(|p| format!("{:>4}", if p.matched { "+" } else { "." }))
            .collect();
        println!("{:>4}  {cells}", first.first);
    }
}
