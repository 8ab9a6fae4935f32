//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use jewel_cache::{FileStore, KvStore};
use jewel_commerce::CartEngine;
use jewel_db::{DocumentStore, FileDocumentStore};
use jewel_observability::{LogLevel, StructuredLogger};

use crate::config::{JewelConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: JewelConfig,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (JewelConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => (JewelConfig::load(&path)?, Some(path)),
                None => (JewelConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.exists())
        })
    }

    /// Operator logger for a component, honoring `[logging]` and `--verbose`.
    pub fn logger(&self, component: &str) -> StructuredLogger {
        let level = if self.output.is_verbose() {
            LogLevel::Debug
        } else {
            self.config.logging.level
        };
        StructuredLogger::new(component)
            .with_min_level(level)
            .with_format(self.config.logging.format)
    }

    /// Open the saved cart.
    pub async fn cart(&self) -> Result<CartEngine> {
        let dir = self.resolve_path(&self.config.storage.cart_dir);
        self.output.debug(&format!("Cart store: {}", dir.display()));
        let store: Arc<dyn KvStore> = Arc::new(
            FileStore::open(&dir)
                .await
                .with_context(|| format!("Failed to open cart store at {}", dir.display()))?,
        );
        Ok(CartEngine::open(store, self.logger("cart")).await)
    }

    /// Open the catalog document store.
    pub async fn catalog(&self) -> Result<Arc<dyn DocumentStore>> {
        let path = self.resolve_path(&self.config.storage.catalog_file);
        self.output.debug(&format!("Catalog: {}", path.display()));
        let store = FileDocumentStore::open(&path)
            .await
            .with_context(|| format!("Failed to open catalog at {}", path.display()))?;
        Ok(Arc::new(store))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
