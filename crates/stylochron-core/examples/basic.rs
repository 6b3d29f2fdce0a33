//! Basic verification and attribution example.
//!
//! Builds three toy "authors" whose chunk vectors follow different patterns,
//! verifies two excerpts of the same author, then attributes an unknown
//! excerpt against the corpus.
//!
//! Run: `cargo run --example basic`

use stylochron_core::{Document, Metric, SweepConfig, determine, verify};

fn excerpt(pattern: &[[f64; 3]], len: usize) -> Document {
    let rows = (0..len).map(|i| pattern[i % pattern.len()].to_vec()).collect();
    Document::from_rows(rows).unwrap_or_default()
}

fn main() {
    let plain = [[1.0, 0.0, 0.2], [0.0, 1.0, 0.2], [0.5, 0.5, 0.0]];
    let terse = [[1.0, 0.0, 0.0]];
    let ornate = [[0.3, 0.3, 1.0], [1.0, 0.1, 0.1]];

    let sweep = SweepConfig::new(2, 8, 1);

    // Two excerpts of one author
    let a = excerpt(&plain, 30);
    let b = excerpt(&plain, 30);
    match verify(&a, &b, sweep, &Metric::Canberra) {
        Ok(v) => println!(
            "same author? {} (confidence {:.4}, window {:?})",
            v.matched, v.confidence, v.window
        ),
        Err(e) => eprintln!("verification failed: {e}"),
    }

    // Attribution against a labeled corpus
    let candidates = vec![excerpt(&terse, 30), excerpt(&plain, 30), excerpt(&ornate, 30)];
    let authors = ["terse", "plain", "ornate"];
    let unknown = excerpt(&plain, 30);
    match determine(&unknown, &candidates, &authors, sweep, &Metric::Canberra) {
        Ok(d) => {
            println!("attributed to: {}", d.author.copied().unwrap_or("(none)"));
            for (index, score) in &d.scores {
                println!("  {:<8} {score:.4}", authors[*index]);
            }
        }
        Err(e) => eprintln!("determination failed: {e}"),
    }
}
