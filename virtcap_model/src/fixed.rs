//! Fixed-point logic-domain quantities.
//!
//! | Type            | Width | Layout                                   |
//! |-----------------|-------|------------------------------------------|
//! | `LogicVoltage`  | u32   | ADC counts (32 / mV) with 13 fraction bits |
//! | `LogicCurrent`  | i32   | ADC counts (3.216 / µA), signed          |
//!
//! Arithmetic on these types never wraps. Operations that can leave the
//! 32-bit range either return `Option` or saturate at the type bound.

use static_assertions::const_assert_eq;
use virtcap_common::consts::{SHIFT_REDISTRIBUTION, SHIFT_VOLT, VOLTAGE_LOGIC_PER_MV};

use crate::units::{current_ua_to_logic, voltage_mv_to_logic};

/// Capacitor-side voltage in logic units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct LogicVoltage(u32);

/// Current in logic units. Positive charges the capacitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct LogicCurrent(i32);

const_assert_eq!(core::mem::size_of::<LogicVoltage>(), 4);
const_assert_eq!(core::mem::size_of::<LogicCurrent>(), 4);

impl LogicVoltage {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Convert from millivolts; `None` above 16 383 mV.
    #[inline]
    pub const fn from_millivolts(mv: u32) -> Option<Self> {
        match voltage_mv_to_logic(mv) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Whole millivolts (truncated). For diagnostics only.
    #[inline]
    pub const fn to_millivolts(self) -> u32 {
        self.0 / (VOLTAGE_LOGIC_PER_MV << SHIFT_VOLT)
    }

    /// Integer ADC counts (`raw >> 13`), the divisor of the current terms.
    #[inline]
    pub const fn adc_counts(self) -> u32 {
        self.0 >> SHIFT_VOLT
    }

    /// Add a signed delta, saturating at `0` and `u32::MAX`.
    #[inline]
    pub const fn saturating_offset(self, delta: i64) -> Self {
        let v = (self.0 as i64).saturating_add(delta);
        if v < 0 {
            Self(0)
        } else if v > u32::MAX as i64 {
            Self(u32::MAX)
        } else {
            Self(v as u32)
        }
    }

    /// Voltage after connecting the output capacitor:
    /// `(v >> 10) × scale`, with `scale` ≈ `1024 × √(retained ratio)`.
    #[inline]
    pub const fn redistribute(self, scale: u32) -> Self {
        // scale ≤ 1024 keeps the product within u32.
        Self((self.0 >> SHIFT_REDISTRIBUTION).saturating_mul(scale))
    }
}

impl LogicCurrent {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert from microamps; `None` if the result exceeds `i32::MAX`.
    #[inline]
    pub const fn from_microamps(ua: u32) -> Option<Self> {
        match current_ua_to_logic(ua) {
            Some(c) if c <= i32::MAX as u32 => Some(Self(c as i32)),
            _ => None,
        }
    }
}
