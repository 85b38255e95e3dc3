//! Per-template sizing configuration.
//!
//! The registry is a JSON object keyed by template name. It is fetched once
//! per processing pass; any failure falls back to a built-in table so that
//! configuration problems never stop a pass.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::template::{DEFAULT_MAX_FONT, DEFAULT_NAME_FONT, DEFAULT_POSITION_FONT};
use crate::error::{Error, Result};
use crate::services::Fetch;

/// Whether a template is a cover or a content slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Content slide with headers and quotes.
    Slide,
    /// Cover slide with headline and section.
    Cover,
}

/// Sizing parameters for one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Slide or cover.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TemplateKind>,
    /// Publication section the template belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Largest font size the fit solver may choose.
    #[serde(default = "default_max_font")]
    pub max_font: f64,
    /// Name line size; zero or absent means unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_font: Option<f64>,
    /// Position line size; zero or absent means unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_font: Option<f64>,
    /// Whether content slides may carry a background image.
    #[serde(default)]
    pub background_image: bool,
    /// Layer names the template is expected to contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<Vec<String>>,
}

const fn default_max_font() -> f64 {
    DEFAULT_MAX_FONT
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self::sized(DEFAULT_MAX_FONT, None, None)
    }
}

impl TemplateConfig {
    /// A config with only sizes set.
    pub const fn sized(max_font: f64, name_font: Option<f64>, position_font: Option<f64>) -> Self {
        Self {
            kind: None,
            section: None,
            max_font,
            name_font,
            position_font,
            background_image: false,
            structure: None,
        }
    }

    /// Fit cap, defaulting when unset or not positive.
    pub const fn max_font_size(&self) -> f64 {
        if self.max_font > 0.0 {
            self.max_font
        } else {
            DEFAULT_MAX_FONT
        }
    }

    /// Whether the template has a name/position layer worth filling.
    pub fn has_name_position(&self) -> bool {
        positive(self.name_font).is_some() || positive(self.position_font).is_some()
    }

    /// Name line size, defaulting when unset.
    pub fn name_font_size(&self) -> f64 {
        positive(self.name_font).unwrap_or(DEFAULT_NAME_FONT)
    }

    /// Position line size, defaulting when unset.
    pub fn position_font_size(&self) -> f64 {
        positive(self.position_font).unwrap_or(DEFAULT_POSITION_FONT)
    }
}

/// All known template configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateConfigs(BTreeMap<String, TemplateConfig>);

impl TemplateConfigs {
    /// Built-in table used when the registry cannot be fetched.
    pub fn fallback() -> Self {
        let table = [
            ("Two chunk quote", TemplateConfig::sized(75.0, Some(60.0), Some(50.0))),
            ("One chunk quote", TemplateConfig::sized(75.0, Some(60.0), Some(50.0))),
            ("Quote with header", TemplateConfig::sized(60.0, Some(60.0), Some(50.0))),
            ("Opinion cover 1", TemplateConfig::sized(80.0, Some(60.0), Some(55.0))),
            ("Opinion cover 2", TemplateConfig::sized(70.0, Some(46.0), Some(46.0))),
            ("Features cover 1", TemplateConfig::sized(85.0, None, None)),
            ("Sports cover 1", TemplateConfig::sized(75.0, None, None)),
            ("News cover 1", TemplateConfig::sized(80.0, None, None)),
            ("News cover 2", TemplateConfig::sized(80.0, None, None)),
            ("Prospect cover 1", TemplateConfig::sized(70.0, None, None)),
        ];
        Self(table.into_iter().map(|(name, config)| (name.to_string(), config)).collect())
    }

    /// Parse a registry document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::parse(format!("Invalid template registry: {e}"), None))
    }

    /// Fetch the registry, falling back to the built-in table on any failure.
    pub async fn load<F: Fetch + ?Sized>(fetcher: &F, url: &str) -> Self {
        match fetcher.fetch(url).await.and_then(|body| Self::from_json(&body)) {
            Ok(configs) => {
                tracing::info!("Loaded {} template configs from {url}", configs.len());
                configs
            }
            Err(e) => {
                tracing::warn!("Error loading template configs from {url}: {e}; using built-in table");
                Self::fallback()
            }
        }
    }

    /// Read a registry file; a missing file is an empty registry.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs_err::read(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        serde_json::from_slice(&raw).map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))
    }

    /// Write the registry as pretty JSON with a trailing newline.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs_err::write(path, json).map_err(|e| Error::io(e, path.to_path_buf()))
    }

    /// Configuration for a template, if known.
    pub fn get(&self, name: &str) -> Option<&TemplateConfig> {
        self.0.get(name)
    }

    /// Add or replace a template entry.
    pub fn upsert(&mut self, name: impl Into<String>, config: TemplateConfig) {
        self.0.insert(name.into(), config);
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
