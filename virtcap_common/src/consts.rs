//! Workspace-wide constants for the virtual capacitor.
//!
//! Single source of truth for the fixed-point layout, the reference board
//! calibration and the default simulation parameters.

use static_assertions::const_assert;

// ─── Fixed-Point Layout ─────────────────────────────────────────────

/// Fractional bits of the voltage logic domain.
///
/// A logic voltage is `millivolts * VOLTAGE_LOGIC_PER_MV << SHIFT_VOLT`, so
/// `cap_voltage >> SHIFT_VOLT` recovers the ADC-resolution value.
pub const SHIFT_VOLT: u32 = 13;

/// Right shift applied to the voltage before multiplying with the
/// output-capacitor scale factor (`2^20` pre-sqrt scale → `2^10` root).
pub const SHIFT_REDISTRIBUTION: u32 = 10;

/// Scale of the output-capacitor ratio before the square root (`2^20`).
pub const OUTPUTCAP_RATIO_SCALE: u32 = 1 << 20;

/// Logic counts per millivolt at 18-bit / 8.192 V full scale (rounded).
pub const VOLTAGE_LOGIC_PER_MV: u32 = 32;

/// Logic counts per milliamp at 17-bit / 4.096 V with 100.5 sense gain (rounded).
pub const CURRENT_LOGIC_PER_MA: u32 = 3216;

/// Largest millivolt value whose logic representation fits in `u32`.
pub const MAX_CONVERTIBLE_MV: u32 = u32::MAX / (VOLTAGE_LOGIC_PER_MV << SHIFT_VOLT);

/// Largest microamp value that converts without overflowing the multiply.
pub const MAX_CONVERTIBLE_UA: u32 = u32::MAX / CURRENT_LOGIC_PER_MA;

/// Fixed-point representation of a unity efficiency factor (`1 << SHIFT_VOLT`).
pub const EFFICIENCY_UNITY: u32 = 1 << SHIFT_VOLT;

const_assert!(SHIFT_REDISTRIBUTION * 2 == 20);
const_assert!(MAX_CONVERTIBLE_MV >= 8192);

// ─── Reference Board Calibration ────────────────────────────────────

/// Current ADC resolution [bits].
pub const ADC_CURRENT_BITS: u32 = 17;

/// Voltage ADC resolution [bits].
pub const ADC_VOLTAGE_BITS: u32 = 18;

/// Current ADC reference full scale [mV].
pub const ADC_CURRENT_REF_MV: u32 = 4096;

/// Voltage ADC reference full scale [mV].
pub const ADC_VOLTAGE_REF_MV: u32 = 8192;

/// Current-sense amplifier gain × 10 (100.5 → 1005).
pub const CURRENT_SENSE_GAIN_X10: u32 = 1005;

/// Input scale derived from the reference board (`kScaleInput`).
pub const REFERENCE_INPUT_SCALE: u32 = 102_911;

// ─── Simulation Defaults ────────────────────────────────────────────

/// Default sample period of the acquisition loop [µs] (100 kHz).
pub const DEFAULT_SAMPLE_PERIOD_US: u32 = 10;

/// Default number of updates between hysteresis evaluations.
pub const DEFAULT_DISCRETIZE: u32 = 1;

/// Upper bound of retained transitions in a scenario summary.
pub const MAX_RECORDED_TRANSITIONS: usize = 256;

/// Default simulator configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "config/virtcap.toml";
