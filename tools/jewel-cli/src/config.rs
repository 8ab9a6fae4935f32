//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use jewel_observability::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// Config file names searched for, nearest directory first.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["jewel.toml", ".jewel.toml", "jewel.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JewelConfig {
    /// Where the cart and catalog live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Operator log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JewelConfig {
    /// Load config from a file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Storage locations, relative to the directory the CLI runs in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the key-value store holding the cart snapshot.
    #[serde(default = "default_cart_dir")]
    pub cart_dir: String,

    /// JSON file holding products, orders and users.
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
}

fn default_cart_dir() -> String {
    ".jewel/cart".to_string()
}

fn default_catalog_file() -> String {
    ".jewel/catalog.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cart_dir: default_cart_dir(),
            catalog_file: default_catalog_file(),
        }
    }
}

/// Log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Lowest level written to stderr. `--verbose` lowers it to debug.
    #[serde(default = "default_level")]
    pub level: LogLevel,

    /// `human` or `json`.
    #[serde(default = "default_format")]
    pub format: LogFormat,
}

fn default_level() -> LogLevel {
    LogLevel::Warn
}

fn default_format() -> LogFormat {
    LogFormat::Human
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Generate a commented default jewel.toml.
pub fn generate_default_config() -> String {
    format!(
        r#"# Jewel storefront configuration

[storage]
# Directory holding the saved cart
cart_dir = "{cart_dir}"
# Products, orders and users
catalog_file = "{catalog_file}"

[logging]
# trace, debug, info, warn or error
level = "warn"
# human or json
format = "human"
"#,
        cart_dir = default_cart_dir(),
        catalog_file = default_catalog_file(),
    )
}
