// ⚙️ Configuration - pricing table, reveal policy, parse mode
// One JSON file; every section optional, defaults are the storefront values

use crate::currency::ParseMode;
use crate::pricing::PricingEngine;
use crate::reveal::RevealSettings;
use crate::rules::MultiplierTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable pointing at the config file
pub const CONFIG_ENV: &str = "PARTS_PRICING_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub pricing: MultiplierTable,

    #[serde(default)]
    pub reveal: RevealSettings,

    #[serde(default)]
    pub parse_mode: ParseMode,
}

impl PricingConfig {
    /// Load and validate a config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: PricingConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path.as_ref()))?;

        config.pricing.validate().context("Invalid pricing table")?;
        config.reveal.validate().context("Invalid reveal settings")?;

        tracing::info!(
            path = ?path.as_ref(),
            categories = config.pricing.category_factors.len(),
            parse_mode = config.parse_mode.as_str(),
            "config loaded"
        );

        Ok(config)
    }

    /// File when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                tracing::info!("no config file given, using standard pricing");
                Ok(Self::default())
            }
        }
    }

    pub fn engine(&self) -> PricingEngine {
        PricingEngine::new(self.pricing.clone()).with_parse_mode(self.parse_mode)
    }
}
