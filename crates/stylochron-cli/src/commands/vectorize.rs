use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::corpus::{Corpus, CorpusEntry, IndexEntry, load_index};
use crate::vectorize::{StopWords, Vectorizer};

pub fn run(index_path: &str, stopwords_path: &str, chunk_size: usize, output_path: &str) -> Result<()> {
    if chunk_size == 0 {
        bail!("--chunk-size must be at least 1");
    }
    let index = load_index(Path::new(index_path))?;
    if index.is_empty() {
        bail!("index {index_path} lists no documents");
    }

    let list = std::fs::read_to_string(stopwords_path)
        .with_context(|| format!("failed to read stop words {stopwords_path}"))?;
    let stop_words = StopWords::parse(&list);
    if stop_words.is_empty() {
        log::warn!("stop-word list {stopwords_path} is empty; every chunk will be a zero vector");
    } else {
        log::info!("loaded {} stop words from {stopwords_path}", stop_words.len());
    }

    // Relative document paths resolve against the index file's directory.
    let base = Path::new(index_path).parent().unwrap_or(Path::new("."));
    let mut texts = Vec::with_capacity(index.len());
    for entry in &index {
        let path = base.join(&entry.path);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        texts.push(text);
    }

    let corpus = build_corpus(&index, &texts, stop_words, chunk_size);

    println!(
        "Vectorized {} documents, vocabulary of {} terms, chunk size {chunk_size}",
        corpus.len(),
        corpus.vocabulary.len()
    );
    for entry in &corpus.documents {
        println!("  {:<24} {:>5} chunks", entry.author, entry.chunks.len());
    }

    corpus.save(Path::new(output_path))?;
    println!("\nCorpus saved to: {output_path}");
    Ok(())
}

/// Fit the vocabulary on the full texts and vectorize each text's chunks.
pub fn build_corpus(
    index: &[IndexEntry],
    texts: &[String],
    stop_words: StopWords,
    chunk_size: usize,
) -> Corpus {
    let vectorizer = Vectorizer::fit(texts, stop_words);
    let documents = index
        .iter()
        .zip(texts)
        .map(|(entry, text)| CorpusEntry {
            author: entry.author.clone(),
            source: Some(entry.path.clone()),
            chunks: vectorizer.document(text, chunk_size),
        })
        .collect();
    Corpus {
        vocabulary: vectorizer.vocabulary().to_vec(),
        documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_corpus() {
        let index = vec![
            IndexEntry {
                author: "a".into(),
                path: "a.txt".into(),
            },
            IndexEntry {
                author: "b".into(),
                path: "b.txt".into(),
            },
        ];
        let texts = vec![
            "the end of the road and the start".to_string(),
            "to be or not to be".to_string(),
        ];
        let stop_words = StopWords::parse("the\nof\nand\nto\nbe");
        let corpus = build_corpus(&index, &texts, stop_words, 10);

        assert_eq!(corpus.vocabulary, vec!["and", "be", "of", "the", "to"]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents[0].chunks.len(), 4);
        assert_eq!(corpus.documents[1].chunks.len(), 2);
        assert_eq!(corpus.documents[1].chunks.dimension(), Some(5));
    }

    #[test]
    fn test_run_writes_corpus() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), "The cat and the hat. Of mice and men.").unwrap();
        std::fs::write(dir.path().join("two.txt"), "To be, or not to be: that is the question.").unwrap();
        std::fs::write(dir.path().join("stop.txt"), "the\nand\nof\nto\nbe\nis\n").unwrap();
        std::fs::write(
            dir.path().join("index.json"),
            r#"[{"author":"seuss","path":"one.txt"},{"author":"shakespeare","path":"two.txt"}]"#,
        )
        .unwrap();

        let out = dir.path().join("corpus.json");
        run(
            dir.path().join("index.json").to_str().unwrap(),
            dir.path().join("stop.txt").to_str().unwrap(),
            16,
            out.to_str().unwrap(),
        )
        .unwrap();

        let corpus = Corpus::load(&out).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents[1].author, "shakespeare");
        assert_eq!(corpus.documents[0].source.as_deref(), Some("one.txt"));
        assert!(corpus.vocabulary.contains(&"be".to_string()));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(run("index.json", "stop.txt", 0, "out.json").is_err());
    }
}
