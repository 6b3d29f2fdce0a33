//! Sweep and decision configuration.
//!
//! Defaults: window sizes 10..100 step 10, a 5% significance level for the
//! two-sample test, and a 0.99 confidence early stop during determination.

use std::iter::StepBy;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distance::Metric;
use crate::error::{EngineError, Result};

/// Half-open, strided range of window sizes: start, start+step, ... < end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 10,
            end: 100,
            step: 10,
        }
    }
}

impl SweepConfig {
    pub fn new(start: usize, end: usize, step: usize) -> Self {
        Self { start, end, step }
    }

    /// Reject sweeps that would evaluate a zero window or never advance.
    ///
    /// `end <= start` is valid and simply yields no window sizes.
    pub fn validate(&self) -> Result<()> {
        if self.start == 0 {
            return Err(EngineError::InvalidSweep(
                "start must be >= 1 (window size 0 divides by zero)".to_string(),
            ));
        }
        if self.step == 0 {
            return Err(EngineError::InvalidSweep("step must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Same end and step, starting at `start`.
    pub fn starting_at(&self, start: usize) -> Self {
        Self { start, ..*self }
    }

    /// Window sizes in sweep order. Call [`validate`](Self::validate) first:
    /// a zero step yields only `start`.
    pub fn windows(&self) -> StepBy<Range<usize>> {
        (self.start..self.end).step_by(self.step.max(1))
    }
}

/// Everything the verifier and determiner need besides the documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sweep: SweepConfig,
    /// Two-sample p-values at or above this level count as "same author".
    pub significance_level: f64,
    /// Determination stops as soon as a candidate reaches this confidence.
    pub stop_confidence: f64,
    /// Built-in metric named in config files and on the command line. The
    /// library entry points take their metric as an explicit argument and
    /// never read this field.
    pub metric: Metric,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sweep: SweepConfig::default(),
            significance_level: stylochron_tests::DEFAULT_SIGNIFICANCE,
            stop_confidence: 0.99,
            metric: Metric::Canberra,
        }
    }
}

impl AnalysisConfig {
    /// Fewer false matches: 1% significance, stop only on a near-exact match.
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            stop_confidence: 0.999,
            ..Self::default()
        }
    }

    /// More matches: 10% significance, stop at 0.95 confidence.
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            stop_confidence: 0.95,
            ..Self::default()
        }
    }

    /// Look up a named preset: `default`, `strict` or `permissive`.
    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "strict" => Ok(Self::strict()),
            "permissive" => Ok(Self::permissive()),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown preset '{other}' (expected default, strict or permissive)"
            ))),
        }
    }

    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.sweep.validate()?;
        if !(self.significance_level > 0.0 && self.significance_level <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "significance_level must be in (0, 1], got {}",
                self.significance_level
            )));
        }
        if !(self.stop_confidence > 0.0 && self.stop_confidence <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "stop_confidence must be in (0, 1], got {}",
                self.stop_confidence
            )));
        }
        Ok(())
    }

    /// Load a (possibly partial) configuration from a JSON file; missing
    /// fields take their defaults.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str::<Self>(&raw).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to parse analysis config JSON: {e}"),
            )
        })
    }
}
