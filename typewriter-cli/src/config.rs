//! Typewriter configuration
//!
//! A TOML file supplies defaults; command-line flags override it.
//!
//! ```toml
//! delay_ms = 60
//! granularity = "node"
//! render = "text"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;
use typewriter_core::Granularity;

/// Delay between units when neither flag nor config sets one.
pub const DEFAULT_DELAY_MS: u64 = 100;

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum GranularityArg {
    /// One unit per character
    #[default]
    Char,
    /// One unit per text node
    Node,
}

impl From<GranularityArg> for Granularity {
    fn from(value: GranularityArg) -> Self {
        match value {
            GranularityArg::Char => Granularity::Character,
            GranularityArg::Node => Granularity::Node,
        }
    }
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Write every unit verbatim, tags included
    #[default]
    Markup,
    /// Write only text, hiding tags
    Text,
}

/// Values read from a config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub delay_ms: Option<u64>,
    pub granularity: Option<GranularityArg>,
    pub render: Option<RenderMode>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Settings for one run after merging flags over the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub delay: Duration,
    pub granularity: Granularity,
    pub render: RenderMode,
}

impl Settings {
    pub fn merge(
        delay_ms: Option<u64>,
        granularity: Option<GranularityArg>,
        render: Option<RenderMode>,
        file: &FileConfig,
    ) -> Self {
        let delay_ms = delay_ms.or(file.delay_ms).unwrap_or(DEFAULT_DELAY_MS);
        Self {
            delay: Duration::from_millis(delay_ms),
            granularity: granularity.or(file.granularity).unwrap_or_default().into(),
            render: render.or(file.render).unwrap_or_default(),
        }
    }
}
