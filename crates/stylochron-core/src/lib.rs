//! # stylochron-core
//!
//! **Authorship as a time series.**
//!
//! `stylochron-core` decides whether two vectorized texts share an author,
//! and attributes an unknown text to the best-matching author of a labeled
//! corpus. Each document is a sequence of equal-dimensionality feature
//! vectors ("chunks"); the engine turns chunk-to-chunk distances into a
//! sliding-window style statistic and compares its distributions with the
//! Kolmogorov-Smirnov two-sample test.
//!
//! ## Quick Start
//!
//! ```
//! use stylochron_core::{Document, Metric, SweepConfig, verify};
//!
//! let rows: Vec<Vec<f64>> = (0..40)
//!     .map(|i| if i % 2 == 0 { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
//!     .collect();
//! let a = Document::from_rows(rows[..20].to_vec()).unwrap();
//! let b = Document::from_rows(rows[20..].to_vec()).unwrap();
//!
//! let result = verify(&a, &b, SweepConfig::new(2, 6, 1), &Metric::Canberra).unwrap();
//! assert!(result.matched);
//! ```
//!
//! ## Architecture
//!
//! Chunk distance → ZV statistic → two ZV samples → KS test → Verifier → Determiner
//!
//! - [`zv()`]: ZV(i, T), the mean distance of chunk `i` to its `T` most recent
//!   chunks in the merged sequence of both documents.
//! - [`verify`]: sweeps the window size and stops at the first window whose
//!   two samples the test cannot tell apart.
//! - [`determine`]: verifies every candidate once per outer window, keeps each
//!   candidate's best confidence, and stops early on a near-certain match.
//! - [`collection`]: all-pairs matrices and leave-one-out attribution.
//!
//! Any [`DistanceMetric`] can be injected; [`Metric`] provides Canberra
//! (default), Euclidean and Spearman.

pub mod collection;
pub mod config;
pub mod determination;
pub mod distance;
pub mod document;
pub mod error;
pub mod verification;
pub mod zv;

pub use collection::{
    CollectionReport, CollectionSummary, LeaveOneOut, PairVerification, determine_leave_one_out,
    run_collection, verify_all_pairs,
};
pub use config::{AnalysisConfig, SweepConfig};
pub use determination::{Determination, determine, determine_with};
pub use distance::{DistanceMetric, Metric, canberra, chunk_distance, euclidean, spearman};
pub use document::{Chunk, Document, MergedSequence};
pub use error::{EngineError, Result};
pub use verification::{NOT_EVALUATED, Verification, two_sample_test, verify, verify_with};
pub use zv::{ZvPoint, ZvSamples, build_samples, zv, zv_profile};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
