//! Run configuration (TOML)

use anyhow::{bail, Context, Result};
use gridscore_algorithms::region::ExtractParams;
use gridscore_algorithms::transform::{ColumnSpec, Reshape};
use gridscore_core::LayerKind;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which table variant goes into the CSV report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportVariant {
    /// Values as extracted
    Raw,
    /// Standardized without reshaping
    #[default]
    Zscore,
    /// Reshaped, then standardized
    Normalized,
}

/// Region of interest
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorConfig {
    pub layer: String,
    pub value: f64,
}

/// One input layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub kind: LayerKind,
    /// Missing cells in this layer do not produce diagnostics
    #[serde(default)]
    pub ignore_missing: bool,
    /// Standardize this layer and write it back
    #[serde(default)]
    pub transform: bool,
    pub reshape: Option<Reshape>,
    /// Output file stem, defaults to the layer name
    pub output: Option<String>,
}

impl LayerConfig {
    /// Output paths (z-score, normalized z-score) inside `dir`
    pub fn output_paths(&self, dir: &Path) -> (PathBuf, PathBuf) {
        let stem = self.output.as_deref().unwrap_or(&self.name);
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("asc");
        (
            dir.join(format!("{stem}_zscore.{ext}")),
            dir.join(format!("{stem}_norm_zscore.{ext}")),
        )
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// A complete run description
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// CSV report file, stdout when absent
    pub report: Option<PathBuf>,
    /// Diagnostic stream file, stderr when absent
    pub diagnostics: Option<PathBuf>,
    #[serde(default)]
    pub report_variant: ReportVariant,
    /// Do not report cells missing in every non-ignorable layer
    #[serde(default)]
    pub skip_uniform_missing: bool,
    /// Fixed decimals for output grids
    pub precision: Option<usize>,
    pub selector: SelectorConfig,
    pub layers: Vec<LayerConfig>,
}

impl RunConfig {
    /// Read, resolve and check a configuration file.
    ///
    /// Relative paths are taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        Ok(config)
    }

    /// Parse and check configuration text without touching the filesystem
    pub fn parse(text: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.output_dir);
        if let Some(p) = self.report.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.diagnostics.as_mut() {
            resolve(p);
        }
        for layer in &mut self.layers {
            resolve(&mut layer.path);
        }
    }

    fn check(&self) -> Result<()> {
        if self.layers.is_empty() {
            bail!("no layers configured");
        }

        let mut names = HashSet::new();
        let mut stems = HashSet::new();
        for layer in &self.layers {
            if !names.insert(layer.name.as_str()) {
                bail!("layer '{}' configured twice", layer.name);
            }
            if layer.reshape.is_some() && !layer.transform {
                bail!("layer '{}' has a reshape but transform = false", layer.name);
            }
            if layer.transform {
                let stem = layer.output.as_deref().unwrap_or(&layer.name);
                if !stems.insert(stem) {
                    bail!("output name '{}' used by more than one layer", stem);
                }
            }
        }

        let selector = self
            .layer(&self.selector.layer)
            .with_context(|| format!("selector layer '{}' is not configured", self.selector.layer))?;
        if selector.transform {
            bail!("selector layer '{}' cannot be transformed", selector.name);
        }
        if !self.transformed().any(|_| true) {
            bail!("no layer has transform = true");
        }
        Ok(())
    }

    pub fn layer(&self, name: &str) -> Option<&LayerConfig> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Layers that are standardized and written back
    pub fn transformed(&self) -> impl Iterator<Item = &LayerConfig> {
        self.layers.iter().filter(|l| l.transform)
    }

    pub fn extract_params(&self) -> ExtractParams {
        ExtractParams {
            selector_layer: self.selector.layer.clone(),
            selector_value: self.selector.value,
            ignore_missing: self
                .layers
                .iter()
                .filter(|l| l.ignore_missing)
                .map(|l| l.name.clone())
                .collect(),
            skip_uniform_missing: self.skip_uniform_missing,
        }
    }

    /// One spec per table column (every layer but the selector)
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        self.layers
            .iter()
            .filter(|l| l.name != self.selector.layer)
            .map(|l| ColumnSpec {
                name: l.name.clone(),
                reshape: l.reshape,
                transform: l.transform,
            })
            .collect()
    }
}
