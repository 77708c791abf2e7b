//! # Virtual Capacitor Model
//!
//! Integer fixed-point simulation of an energy-harvesting storage capacitor.
//! Each update integrates harvested and drawn current over one sample
//! period and decides, with hysteresis, whether the downstream load may draw
//! power. Transitions are reported to an injected [`model::switch::OutputSwitch`].
//!
//! ## Layers
//!
//! 1. **units**: mV / µA → logic units
//! 2. **isqrt**: rounded integer square root (output-capacitor factor)
//! 3. **fixed**: 32-bit logic-domain types, non-wrapping
//! 4. **model**: state, charge balance, hysteresis, switch
//! 5. **scenario**: offline replay of input phases
//!
//! ## Determinism
//!
//! The update performs a fixed number of integer operations, no heap
//! allocation and no I/O. Overflow saturates and is reported through
//! `ArithmeticFault` flags instead of wrapping.

pub mod fixed;
pub mod isqrt;
pub mod model;
pub mod scenario;
pub mod units;

pub use model::hysteresis::OutputState;
pub use model::switch::OutputSwitch;
pub use model::{CapacitorModel, UpdateOutcome};
