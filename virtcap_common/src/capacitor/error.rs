//! Error and fault types for the capacitor model.
//!
//! `SettingsError` rejects configurations that would make the fixed-point
//! update undefined. `ArithmeticFault` flags record which update stage
//! saturated instead of wrapping.

use bitflags::bitflags;
use thiserror::Error;

/// Configuration rejected at model initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Output capacitance of zero makes charge redistribution meaningless.
    #[error("output_cap_uf must be non-zero")]
    ZeroOutputCapacitance,

    /// Storage capacitance must exceed the output capacitance.
    #[error("capacitance_uf ({capacitance_uf}) must exceed output_cap_uf ({output_cap_uf})")]
    CapacitanceOrder {
        capacitance_uf: u32,
        output_cap_uf: u32,
    },

    /// Hysteresis band is empty or inverted.
    #[error("upper threshold ({upper_mv} mV) must exceed lower threshold ({lower_mv} mV)")]
    InvertedThresholds { lower_mv: u32, upper_mv: u32 },

    /// Voltage clamp range is empty or inverted.
    #[error("min_cap_voltage ({min_mv} mV) must be below max_cap_voltage ({max_mv} mV)")]
    InvertedBounds { min_mv: u32, max_mv: u32 },

    /// Minimum voltage of zero allows a division by zero in the update.
    #[error("min_cap_voltage_mv must be non-zero")]
    ZeroMinVoltage,

    /// Initial voltage outside the clamp range.
    #[error("init_cap_voltage ({init_mv} mV) outside [{min_mv}, {max_mv}] mV")]
    InitOutOfBounds { init_mv: u32, min_mv: u32, max_mv: u32 },

    /// Hysteresis re-evaluation interval of zero.
    #[error("discretize must be at least 1")]
    ZeroDiscretize,

    /// Sample period of zero freezes the integration.
    #[error("sample_period_us must be non-zero")]
    ZeroSamplePeriod,

    /// A physical value leaves the 32-bit logic domain after conversion.
    #[error("{field} = {value} overflows the 32-bit logic domain")]
    Overflow { field: &'static str, value: u32 },

    /// Calibration parameters produce an unusable input scale.
    #[error("invalid hardware calibration: {0}")]
    Calibration(&'static str),
}

bitflags! {
    /// Fixed-point stages that saturated during an update.
    ///
    /// Raised per call in `UpdateOutcome` and accumulated in the model
    /// until explicitly cleared.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ArithmeticFault: u8 {
        /// Harvested power → current estimate overflowed.
        const INPUT_CURRENT  = 0x01;
        /// Load current estimate overflowed.
        const OUTPUT_CURRENT = 0x02;
        /// Charge integration `dV = dI·dt/C` overflowed.
        const INTEGRATION    = 0x04;
    }
}

impl Default for ArithmeticFault {
    fn default() -> Self {
        Self::empty()
    }
}
