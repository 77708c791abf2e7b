//! Hardware calibration of the measurement front end.
//!
//! The input-power scale (`kScaleInput`) ties the power measurement to the
//! current and voltage ADC resolutions. It is derived here from the declared
//! board constants instead of being carried as an opaque literal:
//!
//! ```text
//! input_scale = round(gain × (2^Ic − 1) × (2^Iv − 1) / (Vref_c × Vref_v))
//! ```
//!
//! with both references in millivolts and the gain given ×10. The reference
//! board (17/18 bit, 4.096 V / 8.192 V, gain 100.5) yields 102 911.

use serde::{Deserialize, Serialize};

use super::error::SettingsError;
use crate::consts::{
    ADC_CURRENT_BITS, ADC_CURRENT_REF_MV, ADC_VOLTAGE_BITS, ADC_VOLTAGE_REF_MV,
    CURRENT_SENSE_GAIN_X10,
};

/// Widest ADC the derivation accepts [bits].
const MAX_ADC_BITS: u32 = 24;

/// Measurement front-end constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardwareCalibration {
    /// Current ADC resolution [bits].
    pub adc_current_bits: u32,
    /// Voltage ADC resolution [bits].
    pub adc_voltage_bits: u32,
    /// Current ADC full-scale reference [mV].
    pub adc_current_ref_mv: u32,
    /// Voltage ADC full-scale reference [mV].
    pub adc_voltage_ref_mv: u32,
    /// Current-sense amplifier gain × 10.
    pub current_sense_gain_x10: u32,
    /// Pins the input scale, bypassing the derivation.
    pub input_scale_override: Option<u32>,
}

impl Default for HardwareCalibration {
    fn default() -> Self {
        Self {
            adc_current_bits: ADC_CURRENT_BITS,
            adc_voltage_bits: ADC_VOLTAGE_BITS,
            adc_current_ref_mv: ADC_CURRENT_REF_MV,
            adc_voltage_ref_mv: ADC_VOLTAGE_REF_MV,
            current_sense_gain_x10: CURRENT_SENSE_GAIN_X10,
            input_scale_override: None,
        }
    }
}

impl HardwareCalibration {
    /// Input-power scale factor used by the update step.
    pub fn input_scale(&self) -> Result<u32, SettingsError> {
        if let Some(scale) = self.input_scale_override {
            if scale == 0 {
                return Err(SettingsError::Calibration("input_scale_override must be non-zero"));
            }
            return Ok(scale);
        }
        self.validate()?;

        let num = u128::from(self.current_sense_gain_x10)
            * full_scale(self.adc_current_bits)
            * full_scale(self.adc_voltage_bits);
        let den = 10 * u128::from(self.adc_current_ref_mv) * u128::from(self.adc_voltage_ref_mv);
        let scale = rounded_div(num, den);

        match u32::try_from(scale) {
            Ok(0) => Err(SettingsError::Calibration("derived input scale is zero")),
            Ok(s) => Ok(s),
            Err(_) => Err(SettingsError::Calibration("derived input scale exceeds 32 bits")),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_ADC_BITS).contains(&self.adc_current_bits)
            || !(1..=MAX_ADC_BITS).contains(&self.adc_voltage_bits)
        {
            return Err(SettingsError::Calibration("ADC resolution must be 1..=24 bits"));
        }
        if self.adc_current_ref_mv == 0 || self.adc_voltage_ref_mv == 0 {
            return Err(SettingsError::Calibration("ADC reference voltage must be non-zero"));
        }
        if self.current_sense_gain_x10 == 0 {
            return Err(SettingsError::Calibration("current sense gain must be non-zero"));
        }
        Ok(())
    }
}

#[inline]
fn full_scale(bits: u32) -> u128 {
    (1u128 << bits) - 1
}

/// Integer division rounding half up.
#[inline]
fn rounded_div(num: u128, den: u128) -> u128 {
    (num + den / 2) / den
}
