//! Output hysteresis: Off ↔ On.
//!
//! ```text
//!          v > upper
//!   Off ─────────────▶ On
//!    ▲                  │
//!    └──────────────────┘
//!          v < lower
//! ```
//!
//! Evaluated only at debounce boundaries (every `discretize` updates). Inside
//! the band `[lower, upper]` the state is held.

use crate::fixed::LogicVoltage;

/// Whether the downstream load is powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputState {
    /// Load disconnected; load current not modelled.
    #[default]
    Off,
    /// Load connected.
    On,
}

impl OutputState {
    #[inline]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Next state for `voltage`, or `None` when the state is held.
    #[inline]
    pub fn evaluate(
        self,
        voltage: LogicVoltage,
        lower: LogicVoltage,
        upper: LogicVoltage,
    ) -> Option<Self> {
        match self {
            Self::On if voltage < lower => Some(Self::Off),
            Self::Off if voltage > upper => Some(Self::On),
            _ => None,
        }
    }
}

impl From<OutputState> for bool {
    #[inline]
    fn from(state: OutputState) -> bool {
        state.is_on()
    }
}

/// Counts updates between hysteresis evaluations.
///
/// Invariant: `0 <= count < period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceCounter {
    count: u32,
    period: u32,
}

impl DebounceCounter {
    /// `period` must be non-zero (enforced by settings validation).
    #[inline]
    pub const fn new(period: u32) -> Self {
        Self { count: 0, period }
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Advance by one update. Returns `true` on the boundary, where the
    /// counter wraps to zero.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }
}
