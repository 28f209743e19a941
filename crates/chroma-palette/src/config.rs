//! Loading generator configuration from TOML or JSON.
//!
//! ```toml
//! [generator]
//! image_size = 320
//! max_attempts = 3
//!
//! [extractor]
//! program = "/usr/bin/magick"
//! timeout_secs = 30
//!
//! [[rule]]
//! name = "accent"
//! saturation = [60, 100]
//! lightness = [50, 90]
//! ```
//!
//! Every section is optional. When no `[[rule]]` is given the default rule
//! table is used; when any is given it replaces the table entirely.
//!
//! `required = ["pink"]` adds slots that only the image can fill. Naming a
//! standard slot there removes its derivation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::extract::MagickOptions;
use crate::generator::{Generator, GeneratorOptions};
use crate::recipes::SlotPlan;
use crate::rules::{ConditionMap, RuleError};

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaConfig {
    /// Extra classification-only slots.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    pub generator: GeneratorOptions,
    pub extractor: MagickOptions,
    #[serde(rename = "rule")]
    pub rules: ConditionMap,
}

/// Error loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A configuration that parsed but cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("max_attempts must be at least 1")]
    NoAttempts,
    #[error("{field} must be at least 1, got {value}")]
    Shrinking { field: &'static str, value: f64 },
    #[error("{field} must be greater than 0")]
    Zero { field: &'static str },
    #[error("required slot names must not be empty")]
    EmptyRequired,
}

impl ChromaConfig {
    /// Checks rules and generator options.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.rules.validate()?;
        if self.required.iter().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::EmptyRequired);
        }

        let opts = &self.generator;
        if opts.max_attempts == 0 {
            return Err(ValidationError::NoAttempts);
        }
        for (field, value) in [
            ("size_growth", opts.size_growth),
            ("colors_growth", opts.colors_growth),
        ] {
            if value.is_nan() || value < 1.0 {
                return Err(ValidationError::Shrinking { field, value });
            }
        }
        if opts.image_size == 0 {
            return Err(ValidationError::Zero { field: "image_size" });
        }
        if opts.depth == 0 {
            return Err(ValidationError::Zero { field: "depth" });
        }
        if opts.max_colors == 0 {
            return Err(ValidationError::Zero { field: "max_colors" });
        }
        Ok(())
    }

    /// Parses and validates JSON.
    ///
    /// # Errors
    /// Returns `ConfigError` if parsing or validation fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates TOML.
    ///
    /// # Errors
    /// Returns `ConfigError` if parsing or validation fails.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a file, choosing the format by extension (`.toml` or `.json`).
    ///
    /// # Errors
    /// Returns `ConfigError` if reading, parsing, or validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.into())),
            None => Err(ConfigError::UnsupportedFormat("unknown".into())),
        }
    }

    /// # Errors
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// # Errors
    /// Returns `ConfigError` if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The standard slot plan plus the `required` slots.
    pub fn plan(&self) -> SlotPlan {
        self.required
            .iter()
            .fold(SlotPlan::standard(), |plan, name| plan.required(name.as_str()))
    }

    /// A generator for these options, rules and [`plan`](Self::plan).
    pub fn generator(&self) -> Generator {
        Generator::new(self.generator.clone(), self.rules.clone()).with_plan(self.plan())
    }
}
