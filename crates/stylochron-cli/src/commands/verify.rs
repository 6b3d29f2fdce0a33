use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use stylochron_core::{Verification, verify_with};

use super::{AnalysisOptions, format_confidence, write_json};
use crate::corpus::Corpus;

#[derive(Serialize)]
struct VerifyReport<'a> {
    first: usize,
    second: usize,
    first_author: &'a str,
    second_author: &'a str,
    config: stylochron_core::AnalysisConfig,
    result: Verification,
}

pub fn run(corpus_path: &str, first: usize, second: usize, options: &AnalysisOptions) -> Result<()> {
    let config = options.resolve()?;
    let corpus = Corpus::load(Path::new(corpus_path))?;
    let a = corpus.entry(first)?;
    let b = corpus.entry(second)?;

    println!(
        "Verifying document {first} ({}, {} chunks) against document {second} ({}, {} chunks)",
        a.author,
        a.chunks.len(),
        b.author,
        b.chunks.len()
    );
    println!(
        "  metric={} windows {}..{} step {} significance={}",
        config.metric, config.sweep.start, config.sweep.end, config.sweep.step, config.significance_level
    );

    let result = verify_with(&a.chunks, &b.chunks, &config, &config.metric)?;

    if !result.evaluated() {
        eprintln!("Warning: no window could be evaluated; documents are too short for this sweep.");
    }
    let verdict = if result.matched { "SAME AUTHOR" } else { "DIFFERENT AUTHORS" };
    println!("\n  {verdict}");
    println!("  confidence: {}", format_confidence(result.confidence));
    if let Some(window) = result.window {
        println!("  matched at window size {window}");
    }
    println!("  windows tested: {}", result.steps);

    if let Some(path) = &options.output_path {
        write_json(
            path,
            &VerifyReport {
                first,
                second,
                first_author: &a.author,
                second_author: &b.author,
                config,
                result,
            },
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusEntry;
    use stylochron_core::Document;

    fn write_corpus(dir: &Path) -> String {
        let alternating = |len: usize| {
            Document::from_rows(
                (0..len)
                    .map(|i| if i % 2 == 0 { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
                    .collect(),
            )
            .unwrap()
        };
        let corpus = Corpus {
            vocabulary: vec!["and".into(), "the".into()],
            documents: vec![
                CorpusEntry {
                    author: "a".into(),
                    source: None,
                    chunks: alternating(20),
                },
                CorpusEntry {
                    author: "a".into(),
                    source: None,
                    chunks: alternating(20),
                },
            ],
        };
        let path = dir.join("corpus.json");
        corpus.save(&path).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_verify_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(dir.path());
        let output = dir.path().join("report.json");
        let options = AnalysisOptions {
            start: Some(2),
            end: Some(4),
            step: Some(1),
            output_path: Some(output.to_string_lossy().into_owned()),
            ..Default::default()
        };
        run(&corpus, 0, 1, &options).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["result"]["matched"], true);
        assert_eq!(report["result"]["window"], 2);
        assert_eq!(report["config"]["metric"], "canberra");
    }

    #[test]
    fn test_verify_bad_index() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(dir.path());
        assert!(run(&corpus, 0, 7, &AnalysisOptions::default()).is_err());
    }
}
