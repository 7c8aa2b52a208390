//! Generator settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest quiet zone accepted, in modules.
pub const MAX_QUIET_ZONE: u32 = 16;

/// The error correction level of a QR Code symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// Tolerates ~7% erroneous codewords.
    #[default]
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

/// Settings shared by every generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output image width in pixels.
    pub width: u32,
    /// Output image height in pixels.
    pub height: u32,
    /// Light border around the symbol, in modules.
    pub quiet_zone: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            quiet_zone: 4,
            error_correction: ErrorCorrection::Low,
        }
    }
}

impl GeneratorConfig {
    /// Parses TOML content. Missing keys take their default values.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(invalid("width", "must be greater than zero"));
        }
        if self.height == 0 {
            return Err(invalid("height", "must be greater than zero"));
        }
        if self.quiet_zone > MAX_QUIET_ZONE {
            return Err(invalid(
                "quiet_zone",
                &format!("must be at most {MAX_QUIET_ZONE} modules"),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}
