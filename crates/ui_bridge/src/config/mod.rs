//! Configuration system

use std::path::{Path, PathBuf};

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
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

/// Top-level bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Display size written into the IO state before the first frame
    pub display_size: [f32; 2],
    /// Load the GUI library's built-in font when `fonts` is empty
    pub load_default_font: bool,
    /// Shared texture atlas limits
    pub atlas: AtlasConfig,
    /// TrueType fonts loaded at startup, in order
    pub fonts: Vec<FontConfig>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            display_size: [1920.0, 1080.0],
            load_default_font: true,
            atlas: AtlasConfig::default(),
            fonts: Vec::new(),
        }
    }
}

impl Config for UiConfig {}

/// Atlas sizing limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Smallest side length of a freshly created canvas
    pub initial_size: u32,
    /// Largest side length the canvas may grow to
    pub max_dimension: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            initial_size: 256,
            max_dimension: 8192,
        }
    }
}

/// A TrueType font to load at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Path to the `.ttf` file
    pub path: PathBuf,
    /// Pixel size
    pub size: f32,
}
