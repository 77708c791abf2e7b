//! Settings converted to the logic domain, plus derived constants.

use virtcap_common::capacitor::calibration::HardwareCalibration;
use virtcap_common::capacitor::error::SettingsError;
use virtcap_common::capacitor::settings::CapacitorSettings;
use virtcap_common::consts::OUTPUTCAP_RATIO_SCALE;

use crate::fixed::{LogicCurrent, LogicVoltage};
use crate::isqrt::sqrt_rounded;

/// Validated, converted settings. Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicSettings {
    pub lower_threshold: LogicVoltage,
    pub upper_threshold: LogicVoltage,
    pub min_cap_voltage: LogicVoltage,
    pub max_cap_voltage: LogicVoltage,
    pub init_cap_voltage: LogicVoltage,
    /// Carried for completeness; not read by the update.
    pub dc_output_voltage: LogicVoltage,
    pub leakage_current: LogicCurrent,
    /// Carried for completeness; not read by the update.
    pub on_time_leakage_current: LogicCurrent,
    pub capacitance_uf: u32,
    pub output_cap_uf: u32,
    pub converter_efficiency: i32,
    pub sample_period_us: i32,
    pub discretize: u32,
    /// Input-power scale (`kScaleInput`).
    pub input_scale: u32,
    /// `round(√((C − C_out) × 2^20 / C))`, in 1/1024 units.
    pub outputcap_scale_factor: u32,
}

impl LogicSettings {
    /// Validate `settings`, convert to logic units and derive constants.
    pub fn new(
        settings: &CapacitorSettings,
        calibration: &HardwareCalibration,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let input_scale = calibration.input_scale()?;

        Ok(Self {
            lower_threshold: voltage("lower_threshold_mv", settings.lower_threshold_mv)?,
            upper_threshold: voltage("upper_threshold_mv", settings.upper_threshold_mv)?,
            min_cap_voltage: voltage("min_cap_voltage_mv", settings.min_cap_voltage_mv)?,
            max_cap_voltage: voltage("max_cap_voltage_mv", settings.max_cap_voltage_mv)?,
            init_cap_voltage: voltage("init_cap_voltage_mv", settings.init_cap_voltage_mv)?,
            dc_output_voltage: voltage("dc_output_voltage_mv", settings.dc_output_voltage_mv)?,
            leakage_current: current("leakage_current_ua", settings.leakage_current_ua)?,
            on_time_leakage_current: current(
                "on_time_leakage_current_ua",
                settings.on_time_leakage_current_ua,
            )?,
            capacitance_uf: settings.capacitance_uf,
            output_cap_uf: settings.output_cap_uf,
            converter_efficiency: signed("converter_efficiency", settings.converter_efficiency)?,
            sample_period_us: signed("sample_period_us", settings.sample_period_us)?,
            discretize: settings.discretize,
            input_scale,
            outputcap_scale_factor: outputcap_scale_factor(
                settings.capacitance_uf,
                settings.output_cap_uf,
            ),
        })
    }

    /// Divisor of the integration step, `100 × C`.
    #[inline]
    pub const fn integration_divisor(&self) -> i32 {
        // Bounded to i32 by settings validation.
        (self.capacitance_uf * 100) as i32
    }
}

/// Retained-voltage factor after connecting `output_cap_uf` in parallel.
///
/// The ratio is formed in 64 bits: `(C − C_out) × 2^20` exceeds `u32` for
/// any `C − C_out ≥ 4096 µF`. Requires `capacitance_uf > output_cap_uf`.
pub fn outputcap_scale_factor(capacitance_uf: u32, output_cap_uf: u32) -> u32 {
    let retained = u64::from(capacitance_uf - output_cap_uf);
    let ratio = retained * u64::from(OUTPUTCAP_RATIO_SCALE) / u64::from(capacitance_uf);
    // ratio < 2^20
    sqrt_rounded(ratio as u32)
}

fn voltage(field: &'static str, mv: u32) -> Result<LogicVoltage, SettingsError> {
    LogicVoltage::from_millivolts(mv).ok_or(SettingsError::Overflow { field, value: mv })
}

fn current(field: &'static str, ua: u32) -> Result<LogicCurrent, SettingsError> {
    LogicCurrent::from_microamps(ua).ok_or(SettingsError::Overflow { field, value: ua })
}

fn signed(field: &'static str, value: u32) -> Result<i32, SettingsError> {
    i32::try_from(value).map_err(|_| SettingsError::Overflow { field, value })
}
