//! Capacitor model configuration types.
//!
//! - [`settings`]: physical-unit settings and their validation
//! - [`calibration`]: measurement front-end constants and the derived input scale
//! - [`error`]: settings errors and arithmetic fault flags

pub mod calibration;
pub mod error;
pub mod settings;
