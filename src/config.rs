//! Render configuration
//!
//! Small `Copy` settings carried by every surface, and the failure policy
//! a [`crate::Graphics`] context applies. Persisted as JSON the same way
//! scenes are.

use crate::color::Color;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How `blend` combines a translucent source with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// Source-over with destination alpha bookkeeping
    SourceOver,
    /// Straight interpolation by source alpha; destination alpha untouched
    Linear,
}

impl Default for CompositeMode {
    #[cfg(not(feature = "linear-blend"))]
    fn default() -> Self {
        CompositeMode::SourceOver
    }

    #[cfg(feature = "linear-blend")]
    fn default() -> Self {
        CompositeMode::Linear
    }
}

/// What a [`crate::Graphics`] context does with a failure nobody hooked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log and hand the error back to the caller
    #[default]
    Return,
    /// Log and abort the process when no hook is registered
    Abort,
}

/// Per-surface drawing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub composite: CompositeMode,
    /// Source pixels equal to this color are skipped by blits
    #[serde(default)]
    pub chroma_key: Option<Color>,
}

impl RenderConfig {
    pub fn with_composite(mut self, composite: CompositeMode) -> Self {
        self.composite = composite;
        self
    }

    pub fn with_chroma_key(mut self, key: Option<Color>) -> Self {
        self.chroma_key = key;
        self
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_json_shape() {
        let config = RenderConfig::default()
            .with_composite(CompositeMode::Linear)
            .with_chroma_key(Some(Color::LIME));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"linear\""));
        assert!(json.contains(&Color::LIME.0.to_string()));
        assert_eq!(serde_json::to_string(&FailurePolicy::Abort).unwrap(), "\"abort\"");
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("softraster-config-{}.json", std::process::id()));
        let config = RenderConfig::default().with_chroma_key(Some(Color::MAGENTA));
        config.save(&path).unwrap();
        let loaded = RenderConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RenderConfig::load("/nonexistent/softraster.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
