//! Plain-text vectorization: fixed-size character chunks turned into
//! stop-word term-frequency vectors.
//!
//! Only stop words and other content-free terms are kept; their joint usage
//! frequencies carry the stylistic signal the engine compares.

use std::collections::{BTreeSet, HashMap, HashSet};

use stylochron_core::{Chunk, Document};

/// Explicit stop-word list.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// One word per line; surrounding whitespace and blank lines are ignored.
    pub fn parse(list: &str) -> Self {
        Self {
            words: list
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Strip ASCII punctuation, lowercase, split on whitespace and keep only
/// stop words.
pub fn terms(text: &str, stop_words: &StopWords) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase();
    cleaned
        .split_whitespace()
        .filter(|w| stop_words.contains(w))
        .map(str::to_string)
        .collect()
}

/// Consecutive slices of `chunk_size` characters; the last may be shorter.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

/// Term-frequency vectorizer over a fixed, sorted vocabulary.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocabulary: Vec<String>,
    positions: HashMap<String, usize>,
    stop_words: StopWords,
}

impl Vectorizer {
    /// Vocabulary = sorted set of terms kept across the full `texts`.
    pub fn fit<S: AsRef<str>>(texts: &[S], stop_words: StopWords) -> Self {
        let vocabulary: Vec<String> = texts
            .iter()
            .flat_map(|t| terms(t.as_ref(), &stop_words))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let positions = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self {
            vocabulary,
            positions,
            stop_words,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Raw term counts of `text`, L2-normalised. A text with no vocabulary
    /// term yields the zero vector.
    pub fn transform(&self, text: &str) -> Chunk {
        let mut counts = vec![0.0; self.vocabulary.len()];
        for term in terms(text, &self.stop_words) {
            if let Some(&i) = self.positions.get(&term) {
                counts[i] += 1.0;
            }
        }
        let norm = counts.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm > 0.0 {
            counts.iter_mut().for_each(|c| *c /= norm);
        }
        Chunk::new(counts)
    }

    /// Chunk `text` and vectorize every chunk.
    pub fn document(&self, text: &str, chunk_size: usize) -> Document {
        let chunks = chunk_text(text, chunk_size)
            .iter()
            .map(|c| self.transform(c))
            .collect();
        // Every chunk has the vocabulary's dimension.
        Document::new(chunks).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words() -> StopWords {
        StopWords::parse("the\nand\n  of \n\nto\n")
    }

    #[test]
    fn test_parse_stop_words() {
        let sw = stop_words();
        assert_eq!(sw.len(), 4);
        assert!(sw.contains("of"));
        assert!(!sw.contains(""));
    }

    #[test]
    fn test_terms_filter_and_normalise() {
        let sw = stop_words();
        let found = terms("The cat, and THE dog's bowl... Of course!", &sw);
        assert_eq!(found, vec!["the", "and", "the", "of"]);
    }

    #[test]
    fn test_punctuation_joins_words() {
        // "to-the" loses its hyphen and becomes one non-stop-word token.
        let sw = stop_words();
        let found = terms("to-the end", &sw);
        assert!(found.is_empty());
    }

    #[test]
    fn test_chunk_text_by_characters() {
        assert_eq!(chunk_text("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(chunk_text("héllo", 2), vec!["hé", "ll", "o"]);
        assert!(chunk_text("", 4).is_empty());
    }

    #[test]
    fn test_vocabulary_sorted() {
        let v = Vectorizer::fit(&["to the end and back", "of mice"], stop_words());
        assert_eq!(v.vocabulary(), ["and", "of", "the", "to"]);
    }

    #[test]
    fn test_transform_l2_normalised() {
        let v = Vectorizer::fit(&["the and the of"], stop_words());
        // vocabulary: and, of, the
        let chunk = v.transform("the the and");
        let expected = [1.0 / 5f64.sqrt(), 0.0, 2.0 / 5f64.sqrt()];
        for (got, want) in chunk.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert_eq!(v.transform("no stop words here").as_slice(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_document_chunks_share_dimension() {
        let text = "the cat and the hat of the town";
        let v = Vectorizer::fit(&[text], stop_words());
        let doc = v.document(text, 8);
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.dimension(), Some(v.vocabulary().len()));
    }
}
