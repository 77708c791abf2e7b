//! Physical → logic unit conversion.
//!
//! Logic units match the native resolution of the measurement ADCs:
//!
//! ```text
//! voltage: mV × 32 << 13        (18 bit over 8.192 V, 13 fractional bits)
//! current: µA × 3216 / 1000     (17 bit over 4.096 V, sense gain 100.5)
//! ```
//!
//! Both conversions are monotonic. They return `None` instead of wrapping
//! when the result leaves the 32-bit domain.

use virtcap_common::consts::{CURRENT_LOGIC_PER_MA, SHIFT_VOLT, VOLTAGE_LOGIC_PER_MV};

/// Convert millivolts to logic voltage.
///
/// Defined for `voltage_mv <= MAX_CONVERTIBLE_MV` (16 383 mV).
#[inline]
pub const fn voltage_mv_to_logic(voltage_mv: u32) -> Option<u32> {
    match voltage_mv.checked_mul(VOLTAGE_LOGIC_PER_MV) {
        // Shift overflow is checked as a multiply; `checked_shl` only checks the shift amount.
        Some(v) => v.checked_mul(1 << SHIFT_VOLT),
        None => None,
    }
}

/// Convert microamps to logic current. Truncates toward zero.
#[inline]
pub const fn current_ua_to_logic(current_ua: u32) -> Option<u32> {
    match current_ua.checked_mul(CURRENT_LOGIC_PER_MA) {
        Some(c) => Some(c / 1000),
        None => None,
    }
}
