//! Deployment settings
//!
//! Configuration is fixed at deployment: read once at startup from a YAML
//! file, never written back. Snap fractions and drag thresholds are
//! compile-time constants and deliberately absent here.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::loader::LoaderConfig;

/// Reference-deployment document address
pub const DEFAULT_SOURCE: &str =
    "https://ontheline.trincoll.edu/images/bookdown/sample-local-pdf.pdf";

/// Which loader strategy the deployment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Replace-and-remount an embedded viewer
    Frame,
    /// Load into a scrollable container
    Scroll,
    /// Fetch probe, then an embedded viewer
    Probe,
    /// Rasterize every page locally
    #[default]
    Paged,
}

impl StrategyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frame => "frame",
            Self::Scroll => "scroll",
            Self::Probe => "probe",
            Self::Paged => "paged",
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frame" => Ok(Self::Frame),
            "scroll" => Ok(Self::Scroll),
            "probe" => Ok(Self::Probe),
            "paged" => Ok(Self::Paged),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Document source address (URL, or local path for the paged strategy)
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default)]
    pub strategy: StrategyKind,

    /// Load deadline in seconds for the frame/scroll/probe strategies
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: default_source(),
            strategy: StrategyKind::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults on any failure.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match fs::read_to_string(path) {
            Ok(raw) => match serde_yaml::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("failed to parse {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("failed to read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig::new(self.source.clone()).with_timeout(self.timeout())
    }
}
