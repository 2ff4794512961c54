//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::view::{enable_debug_bounding_box, DebugOverlayConfig};
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_str_with_format(&contents, Format::of(path)?)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_with_format(Format::of(path)?)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Parse configuration text
    fn from_str_with_format(contents: &str, format: Format) -> Result<Self, ConfigError> {
        match format {
            Format::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Render configuration text
    fn to_string_with_format(&self, format: Format) -> Result<String, ConfigError> {
        match format {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl Format {
    /// Pick the format from a file extension
    pub fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// View settings loaded at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Debug bounding-box overlay
    pub debug_overlay: DebugOverlayConfig,
}

impl Config for ViewConfig {}

impl ViewConfig {
    /// Push the settings into the process-wide state
    ///
    /// The overlay can only be switched on this way, matching
    /// [`enable_debug_bounding_box`].
    pub fn apply_globally(&self) {
        if self.debug_overlay.enabled {
            enable_debug_bounding_box(self.debug_overlay.color);
        }
    }
}
