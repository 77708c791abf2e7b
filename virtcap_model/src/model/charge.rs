//! Charge balance of one update step.
//!
//! Every stage keeps the firmware's operation order (each `/` truncates,
//! each `>>` is applied where written) so that in-range inputs reproduce the
//! firmware bit for bit. Where the firmware would wrap, the stage saturates
//! and raises its [`ArithmeticFault`] flag instead.

use virtcap_common::capacitor::error::ArithmeticFault;
use virtcap_common::consts::SHIFT_VOLT;

use super::logic::LogicSettings;
use crate::fixed::{LogicCurrent, LogicVoltage};

/// Harvested current estimate, net of leakage:
///
/// ```text
/// ((input_power × input_scale) / (cap >> 13)) × efficiency >> 13 − leakage
/// ```
#[inline]
pub fn input_current(
    settings: &LogicSettings,
    cap: LogicVoltage,
    input_power: u32,
    efficiency: u32,
    faults: &mut ArithmeticFault,
) -> LogicCurrent {
    let flag = ArithmeticFault::INPUT_CURRENT;
    let scaled = checked_or(
        input_power.checked_mul(settings.input_scale),
        u32::MAX,
        flag,
        faults,
    );
    // cap >= min_cap_voltage >= 1 mV keeps the divisor non-zero.
    let per_volt = scaled / cap.adc_counts();
    let weighted = checked_or(per_volt.checked_mul(efficiency), u32::MAX, flag, faults);
    let current = checked_or(
        i32::try_from(weighted >> SHIFT_VOLT).ok(),
        i32::MAX,
        flag,
        faults,
    );

    // Both operands are non-negative.
    LogicCurrent::from_raw(current.saturating_sub(settings.leakage_current.raw()))
}

/// Load current referred to the capacitor, including converter losses:
///
/// ```text
/// ((voltage_measured × current_measured) / (cap >> 13)) × converter_efficiency >> 13
/// ```
///
/// Signed throughout; a negative load current (back-feed) charges the
/// capacitor. Intermediates are 64-bit so the full `u32` load product
/// range is exact; only a result outside `i32` saturates.
#[inline]
pub fn output_current(
    settings: &LogicSettings,
    cap: LogicVoltage,
    voltage_measured: u32,
    current_measured: i32,
    faults: &mut ArithmeticFault,
) -> LogicCurrent {
    // |u32 × i32| < 2^63
    let power = i64::from(voltage_measured) * i64::from(current_measured);
    let per_volt = power / i64::from(cap.adc_counts());
    let weighted = per_volt.saturating_mul(i64::from(settings.converter_efficiency)) >> SHIFT_VOLT;
    LogicCurrent::from_raw(saturate_i32(weighted, ArithmeticFault::OUTPUT_CURRENT, faults))
}

/// Unclamped voltage after integrating `dV = dI·dt / C`:
///
/// ```text
/// cap + (((input − output) << 13) × sample_period_us) / (100 × C)
/// ```
///
/// Computed in 64 bits; the result saturates at the `u32` voltage range.
#[inline]
pub fn integrate(
    settings: &LogicSettings,
    cap: LogicVoltage,
    input: LogicCurrent,
    output: LogicCurrent,
    faults: &mut ArithmeticFault,
) -> LogicVoltage {
    let net = i64::from(input.raw()) - i64::from(output.raw());
    // |net << 13| < 2^45
    let shifted = net << SHIFT_VOLT;
    let charge = checked_or(
        shifted.checked_mul(i64::from(settings.sample_period_us)),
        shifted.saturating_mul(i64::from(settings.sample_period_us)),
        ArithmeticFault::INTEGRATION,
        faults,
    );
    cap.saturating_offset(charge / i64::from(settings.integration_divisor()))
}

#[inline]
fn saturate_i32(value: i64, fault: ArithmeticFault, faults: &mut ArithmeticFault) -> i32 {
    match i32::try_from(value) {
        Ok(v) => v,
        Err(_) => {
            faults.insert(fault);
            if value < 0 {
                i32::MIN
            } else {
                i32::MAX
            }
        }
    }
}

#[inline]
fn checked_or<T>(
    value: Option<T>,
    saturated: T,
    fault: ArithmeticFault,
    faults: &mut ArithmeticFault,
) -> T {
    match value {
        Some(v) => v,
        None => {
            faults.insert(fault);
            saturated
        }
    }
}
