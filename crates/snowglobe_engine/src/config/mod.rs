//! Configuration system

pub use serde::{Serialize, Deserialize};

/// Configuration trait
///
/// Anything serde can round-trip gets TOML/RON file support for free; the
/// format is picked from the file extension.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            Self::from_toml_str(&contents)
        } else if path.ends_with(".ron") {
            Self::from_ron_str(&contents)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            self.to_toml_string()?
        } else if path.ends_with(".ron") {
            self.to_ron_string()?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Parse from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse from RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render as pretty TOML
    fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Render as pretty RON
    fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
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

    /// Values parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
