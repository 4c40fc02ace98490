//! `gredit.toml` configuration.
//!
//! ```toml
//! context = "context"
//! kernel-tables = ["kernels/extra.toml"]
//! log-level = "info"
//! ```
//!
//! Relative kernel table paths are resolved against the directory holding
//! the configuration file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use gredit_core::{is_identifier, KernelRegistry, KernelTable};

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "gredit.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GreditConfig {
    /// Name of the context variable in generated code.
    #[serde(default = "default_context")]
    pub context: String,
    /// Extra kernel descriptor tables, registered after the standard table.
    #[serde(default)]
    pub kernel_tables: Vec<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_context() -> String {
    "context".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for GreditConfig {
    fn default() -> Self {
        Self {
            context: default_context(),
            kernel_tables: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl GreditConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: GreditConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        if let Some(dir) = path.parent() {
            for table in &mut config.kernel_tables {
                if table.is_relative() {
                    *table = dir.join(&*table);
                }
            }
        }
        Ok(config)
    }

    /// Use `explicit` when given, otherwise `gredit.toml` in `dir` if it
    /// exists, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides: a context name replaces the configured
    /// one, kernel tables are appended.
    pub fn apply_overrides(&mut self, context: Option<String>, kernel_tables: Vec<PathBuf>) {
        if let Some(context) = context {
            self.context = context;
        }
        self.kernel_tables.extend(kernel_tables);
    }

    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.context) {
            bail!("context name \"{}\" is not a C identifier", self.context);
        }
        Ok(())
    }

    /// Builtins, the standard node table, then every configured table.
    pub fn build_registry(&self) -> Result<KernelRegistry> {
        let mut builder = KernelRegistry::builder();
        builder
            .register_builtins()
            .register_table(&KernelTable::standard())
            .context("registering the standard kernel table")?;

        for path in &self.kernel_tables {
            let table = KernelTable::load(path)?;
            builder
                .register_table(&table)
                .with_context(|| format!("registering kernels from {}", path.display()))?;
            tracing::debug!(path = %path.display(), kernels = table.len(), "loaded kernel table");
        }

        let registry = builder.build();
        tracing::debug!(kernels = registry.len(), "kernel registry ready");
        Ok(registry)
    }
}
