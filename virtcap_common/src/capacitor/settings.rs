//! Capacitor settings in physical units.
//!
//! Loaded from the `[capacitor]` TOML table. Converted to the logic domain
//! once, at model initialisation; immutable afterwards.

use serde::{Deserialize, Serialize};

use super::error::SettingsError;
use crate::consts::{
    DEFAULT_DISCRETIZE, DEFAULT_SAMPLE_PERIOD_US, EFFICIENCY_UNITY, MAX_CONVERTIBLE_MV,
    MAX_CONVERTIBLE_UA,
};

const I32_MAX: u32 = i32::MAX as u32;

/// Virtual capacitor configuration (mV / µA / µF / µs).
///
/// # TOML Example
///
/// ```toml
/// [capacitor]
/// lower_threshold_mv = 2500
/// upper_threshold_mv = 3500
/// capacitance_uf = 10000
/// output_cap_uf = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacitorSettings {
    /// Switch-off threshold (lower edge of the hysteresis band) [mV].
    pub lower_threshold_mv: u32,
    /// Switch-on threshold (upper edge of the hysteresis band) [mV].
    pub upper_threshold_mv: u32,
    /// Lower clamp of the simulated voltage [mV].
    pub min_cap_voltage_mv: u32,
    /// Upper clamp of the simulated voltage [mV].
    pub max_cap_voltage_mv: u32,
    /// Voltage at initialisation [mV].
    pub init_cap_voltage_mv: u32,
    /// Regulated output voltage [mV]. Stored, not used by the update.
    pub dc_output_voltage_mv: u32,
    /// Constant self-discharge [µA].
    pub leakage_current_ua: u32,
    /// Additional leakage while outputting [µA]. Stored, not used by the update.
    pub on_time_leakage_current_ua: u32,
    /// Storage capacitance [µF].
    pub capacitance_uf: u32,
    /// Output capacitance connected when outputting starts [µF].
    pub output_cap_uf: u32,
    /// Load-path factor, Q13 (8192 = lossless converter).
    pub converter_efficiency: u32,
    /// Interval between update calls [µs].
    pub sample_period_us: u32,
    /// Update calls between hysteresis evaluations.
    pub discretize: u32,
}

impl Default for CapacitorSettings {
    fn default() -> Self {
        Self {
            lower_threshold_mv: 2500,
            upper_threshold_mv: 3500,
            min_cap_voltage_mv: 1000,
            max_cap_voltage_mv: 4500,
            init_cap_voltage_mv: 1000,
            dc_output_voltage_mv: 3000,
            leakage_current_ua: 10,
            on_time_leakage_current_ua: 20,
            capacitance_uf: 10_000,
            output_cap_uf: 1000,
            // 90 % converter: load current is scaled by 1/0.9.
            converter_efficiency: EFFICIENCY_UNITY * 10 / 9,
            sample_period_us: DEFAULT_SAMPLE_PERIOD_US,
            discretize: DEFAULT_DISCRETIZE,
        }
    }
}

impl CapacitorSettings {
    /// Reject configurations that make the fixed-point update undefined.
    ///
    /// # Errors
    ///
    /// See [`SettingsError`]. Checks run in declaration order and the first
    /// violation is returned.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.output_cap_uf == 0 {
            return Err(SettingsError::ZeroOutputCapacitance);
        }
        if self.capacitance_uf <= self.output_cap_uf {
            return Err(SettingsError::CapacitanceOrder {
                capacitance_uf: self.capacitance_uf,
                output_cap_uf: self.output_cap_uf,
            });
        }
        if self
            .capacitance_uf
            .checked_mul(100)
            .is_none_or(|c| c > I32_MAX)
        {
            return Err(SettingsError::Overflow {
                field: "capacitance_uf",
                value: self.capacitance_uf,
            });
        }
        if self.upper_threshold_mv <= self.lower_threshold_mv {
            return Err(SettingsError::InvertedThresholds {
                lower_mv: self.lower_threshold_mv,
                upper_mv: self.upper_threshold_mv,
            });
        }
        if self.min_cap_voltage_mv == 0 {
            return Err(SettingsError::ZeroMinVoltage);
        }
        if self.min_cap_voltage_mv >= self.max_cap_voltage_mv {
            return Err(SettingsError::InvertedBounds {
                min_mv: self.min_cap_voltage_mv,
                max_mv: self.max_cap_voltage_mv,
            });
        }
        if !(self.min_cap_voltage_mv..=self.max_cap_voltage_mv).contains(&self.init_cap_voltage_mv)
        {
            return Err(SettingsError::InitOutOfBounds {
                init_mv: self.init_cap_voltage_mv,
                min_mv: self.min_cap_voltage_mv,
                max_mv: self.max_cap_voltage_mv,
            });
        }
        if self.discretize == 0 {
            return Err(SettingsError::ZeroDiscretize);
        }
        if self.sample_period_us == 0 {
            return Err(SettingsError::ZeroSamplePeriod);
        }
        // Both enter the signed integration path.
        if self.sample_period_us > I32_MAX {
            return Err(SettingsError::Overflow {
                field: "sample_period_us",
                value: self.sample_period_us,
            });
        }
        if self.converter_efficiency > I32_MAX {
            return Err(SettingsError::Overflow {
                field: "converter_efficiency",
                value: self.converter_efficiency,
            });
        }

        for (field, value) in self.voltages() {
            if value > MAX_CONVERTIBLE_MV {
                return Err(SettingsError::Overflow { field, value });
            }
        }
        for (field, value) in self.currents() {
            if value > MAX_CONVERTIBLE_UA {
                return Err(SettingsError::Overflow { field, value });
            }
        }
        Ok(())
    }

    /// Voltage fields with their names, for conversion checks.
    fn voltages(&self) -> [(&'static str, u32); 6] {
        [
            ("lower_threshold_mv", self.lower_threshold_mv),
            ("upper_threshold_mv", self.upper_threshold_mv),
            ("min_cap_voltage_mv", self.min_cap_voltage_mv),
            ("max_cap_voltage_mv", self.max_cap_voltage_mv),
            ("init_cap_voltage_mv", self.init_cap_voltage_mv),
            ("dc_output_voltage_mv", self.dc_output_voltage_mv),
        ]
    }

    fn currents(&self) -> [(&'static str, u32); 2] {
        [
            ("leakage_current_ua", self.leakage_current_ua),
            ("on_time_leakage_current_ua", self.on_time_leakage_current_ua),
        ]
    }
}
