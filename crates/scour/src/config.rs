//! `scour.toml` handling.
//!
//! ```toml
//! [java]
//! version = "17"
//! includes = ["SafeAndConsensual"]
//! excludes = ["UseVar"]
//! production_ready_only = true
//! line_ending = "preserve"
//! style = "whitespace"
//! tab_width = 4
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scour_java::LineEndingHint;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "scour.toml";

/// Post-processing applied to reconciled output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    None,
    /// Trim trailing whitespace and end with exactly one newline
    Whitespace,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScourConfig {
    #[serde(default)]
    pub java: JavaConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JavaConfig {
    pub version: Option<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub production_ready_only: bool,
    pub line_ending: Option<String>,
    pub style: Option<Style>,
    /// Indentation tabs expand to this width under the whitespace style
    pub tab_width: Option<usize>,
}

impl Default for JavaConfig {
    fn default() -> Self {
        JavaConfig {
            version: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            production_ready_only: true,
            line_ending: None,
            style: None,
            tab_width: None,
        }
    }
}

impl JavaConfig {
    pub fn line_ending_hint(&self) -> Result<Option<LineEndingHint>> {
        self.line_ending
            .as_deref()
            .map(|s| s.parse::<LineEndingHint>())
            .transpose()
            .context("Invalid java.line_ending")
    }
}

impl ScourConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `explicit`, or `scour.toml` from `dir` when present.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(CONFIG_FILE);
                if !candidate.is_file() {
                    log::debug!("No {CONFIG_FILE} in {}", dir.display());
                    return Ok(ScourConfig::default());
                }
                candidate
            }
        };
        log::debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
