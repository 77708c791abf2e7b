//! Simulator configuration loading.
//!
//! A single TOML file describes the service identity, the capacitor, the
//! measurement calibration and the input phases to replay:
//!
//! ```toml
//! [shared]
//! service_name = "virtcap-bench-01"
//! log_level = "debug"
//!
//! [capacitor]
//! capacitance_uf = 10000
//! output_cap_uf = 1000
//!
//! [[phases]]
//! samples = 50000
//! input_power = 2000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::capacitor::calibration::HardwareCalibration;
use crate::capacitor::error::SettingsError;
use crate::capacitor::settings::CapacitorSettings;
use crate::consts::EFFICIENCY_UNITY;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// Reading or TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Capacitor settings rejected.
    #[error("Invalid capacitor settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Log verbosity, lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `[shared] log_level` of a config file, read before full parsing so
    /// logging can be installed ahead of [`ConfigLoader::load`].
    ///
    /// `None` if the file is unreadable or not TOML; the default level if
    /// the key is absent. Other tables are ignored.
    pub fn peek(path: &Path) -> Option<Self> {
        #[derive(Deserialize)]
        struct Shared {
            #[serde(default)]
            log_level: LogLevel,
        }
        #[derive(Deserialize)]
        struct Document {
            shared: Option<Shared>,
        }

        let content = std::fs::read_to_string(path).ok()?;
        let doc: Document = toml::from_str(&content).ok()?;
        Some(doc.shared.map(|s| s.log_level).unwrap_or_default())
    }
}

/// Service identity and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    pub service_name: String,
}

impl SharedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Constant measurement inputs held for `samples` consecutive updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Phase {
    /// Number of update calls in this phase.
    pub samples: u32,
    /// Harvested input power (measurement units).
    #[serde(default)]
    pub input_power: u32,
    /// Input-path efficiency, Q13.
    #[serde(default = "default_efficiency")]
    pub efficiency: u32,
    /// Load voltage, same scale as `cap_voltage >> 13`.
    #[serde(default)]
    pub voltage_measured: u32,
    /// Load current, logic units.
    #[serde(default)]
    pub current_measured: i32,
}

fn default_efficiency() -> u32 {
    EFFICIENCY_UNITY
}

/// Complete simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub capacitor: CapacitorSettings,
    #[serde(default)]
    pub calibration: HardwareCalibration,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

/// Loading contract: parse TOML, then validate.
///
/// - `ConfigError::FileNotFound` if the file does not exist
/// - `ConfigError::ParseError` on I/O or TOML syntax errors
/// - `ConfigError::ValidationError` / `ConfigError::Settings` on semantic errors
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Semantic checks run after a successful parse.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Parse and validate a TOML document.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load, parse and validate a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(format!("{}: {e}", path.display()))
            }
        })?;
        debug!(path = %path.display(), bytes = content.len(), "configuration read");
        Self::from_toml_str(&content)
    }
}

impl ConfigLoader for SimConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.capacitor.validate()?;
        self.calibration.input_scale()?;

        if self.phases.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[phases]] entry is required".to_string(),
            ));
        }
        if let Some(i) = self.phases.iter().position(|p| p.samples == 0) {
            return Err(ConfigError::ValidationError(format!(
                "phases[{i}].samples must be non-zero"
            )));
        }
        Ok(())
    }
}

impl SimConfig {
    /// Total number of update calls across all phases.
    pub fn total_samples(&self) -> u64 {
        self.phases.iter().map(|p| u64::from(p.samples)).sum()
    }
}
