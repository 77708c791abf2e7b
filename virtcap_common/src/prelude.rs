//! Common re-exports.
//!
//! ```rust
//! use virtcap_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, Phase, SharedConfig, SimConfig};

// ─── Capacitor ──────────────────────────────────────────────────────
pub use crate::capacitor::calibration::HardwareCalibration;
pub use crate::capacitor::error::{ArithmeticFault, SettingsError};
pub use crate::capacitor::settings::CapacitorSettings;

// ─── Fixed-Point Layout ─────────────────────────────────────────────
pub use crate::consts::{EFFICIENCY_UNITY, SHIFT_VOLT};
