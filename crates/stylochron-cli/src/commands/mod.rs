pub mod collect;
pub mod determine;
pub mod vectorize;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use stylochron_core::{AnalysisConfig, Metric};

/// Analysis flags as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub metric: Option<String>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub step: Option<usize>,
    pub preset: Option<String>,
    pub config_path: Option<String>,
    pub output_path: Option<String>,
}

impl AnalysisOptions {
    /// Defaults (or a named preset, or the config file), then explicit flags.
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match (&self.config_path, &self.preset) {
            (Some(_), Some(_)) => bail!("--preset and --config cannot be combined"),
            (Some(path), None) => AnalysisConfig::load(Path::new(path))
                .with_context(|| format!("failed to load config {path}"))?,
            (None, Some(name)) => AnalysisConfig::preset(name)?,
            (None, None) => AnalysisConfig::default(),
        };
        if let Some(metric) = &self.metric {
            config.metric = parse_metric(metric)?;
        }
        if let Some(start) = self.start {
            config.sweep.start = start;
        }
        if let Some(end) = self.end {
            config.sweep.end = end;
        }
        if let Some(step) = self.step {
            config.sweep.step = step;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse a metric name into the enum.
pub fn parse_metric(s: &str) -> Result<Metric> {
    Ok(s.parse::<Metric>()?)
}

/// Pretty-print `value` as JSON to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {path}"))?;
    println!("\nReport saved to: {path}");
    Ok(())
}

/// Human-readable confidence: the -1 "never evaluated" sentinel prints as "n/a".
pub fn format_confidence(confidence: f64) -> String {
    if confidence < 0.0 {
        "n/a".to_string()
    } else {
        format!("{confidence:.4}")
    }
}
