use crate::error::{Error, Result};
use crate::width::Width;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Random demonstration run: `iterations` pairs drawn from `[0, max_operand)`.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_max_operand")]
    pub max_operand: i32,
    /// Fixed seed for a reproducible run; drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            max_operand: default_max_operand(),
            seed: None,
        }
    }
}

/// Sampled check of the adder against native wrapping addition.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyConfig {
    #[serde(default)]
    pub width: Width,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            width: Width::default(),
            samples: default_samples(),
            workers: default_workers(),
            seed: None,
        }
    }
}

// Defaults
fn default_iterations() -> usize {
    100
}
fn default_max_operand() -> i32 {
    10
}
fn default_samples() -> usize {
    100_000
}
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.demo.validate()?;
        self.verify.validate()
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_operand <= 0 {
            return Err(Error::config(format!(
                "demo.max_operand must be positive, got {}",
                self.max_operand
            )));
        }
        Ok(())
    }

    /// Replace file values with any flags given on the command line.
    pub fn apply_overrides(
        &mut self,
        iterations: Option<usize>,
        max_operand: Option<i32>,
        seed: Option<u64>,
    ) {
        if let Some(n) = iterations {
            self.iterations = n;
        }
        if let Some(max) = max_operand {
            self.max_operand = max;
        }
        if seed.is_some() {
            self.seed = seed;
        }
    }
}

impl VerifyConfig {
    pub fn apply_overrides(
        &mut self,
        width: Option<Width>,
        samples: Option<usize>,
        workers: Option<usize>,
        seed: Option<u64>,
    ) {
        if let Some(w) = width {
            self.width = w;
        }
        if let Some(n) = samples {
            self.samples = n;
        }
        if let Some(n) = workers {
            self.workers = n;
        }
        if seed.is_some() {
            self.seed = seed;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::config("verify.workers must be at least 1"));
        }
        Ok(())
    }
}
