//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! max_rows = 32
//! max_attempts = 5
//!
//! [[languages]]
//! name = "Tiny"
//! letters = "PQR"
//! negation = "-"
//! conjunction = "&"
//! ```
//!
//! Missing fields take their defaults; extra languages are validated and
//! added on top of the built-in ones by [`EngineConfig::languages`].
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::language::{Language, Languages};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest declared row count a truth table may have.
    pub max_rows: usize,
    /// Validation attempts granted before a table is given up on.
    pub max_attempts: u32,
    /// Do not check the values of basic-formula columns.
    pub skip_basic_columns: bool,
    /// Additional object languages.
    #[serde(rename = "languages")]
    pub extra_languages: Vec<Language>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rows: 64,
            max_attempts: 3,
            skip_basic_columns: false,
            extra_languages: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        for language in &config.extra_languages {
            language.validate()?;
        }
        log::debug!(
            "loaded engine configuration: max_rows={}, max_attempts={}, {} extra language(s)",
            config.max_rows,
            config.max_attempts,
            config.extra_languages.len()
        );
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Built-in languages plus the configured ones.
    pub fn languages(&self) -> Result<Languages, ConfigError> {
        let mut registry = Languages::builtin();
        for language in &self.extra_languages {
            registry.register(language.clone())?;
        }
        Ok(registry)
    }
}
