//! Resolver configuration, loaded from TOML
//!
//! ```toml
//! report_duplicate_refs = true
//! report_scope_shadowing = false
//! max_parallel_modules = 8
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Emit a warning for export list entries that appear more than once
    pub report_duplicate_refs: bool,
    /// Emit a warning when an explicit import shadows implicit ones
    pub report_scope_shadowing: bool,
    /// Upper bound on modules resolved at once within a dependency layer
    pub max_parallel_modules: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            report_duplicate_refs: true,
            report_scope_shadowing: true,
            max_parallel_modules: default_max_parallel_modules(),
        }
    }
}

fn default_max_parallel_modules() -> usize {
    4
}

impl ResolveConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        if config.max_parallel_modules == 0 {
            tracing::warn!("max_parallel_modules = 0, using 1");
            config.max_parallel_modules = 1;
        }
        Ok(config)
    }
}

impl FromStr for ResolveConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
