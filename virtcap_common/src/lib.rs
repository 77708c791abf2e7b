//! Virtual capacitor common library.
//!
//! Shared constants, capacitor settings, calibration and configuration
//! loading used by the model crate and its simulator binary.
//!
//! # Module Structure
//!
//! - [`consts`] - Fixed-point layout and reference board constants
//! - [`capacitor`] - Settings, calibration and error types
//! - [`config`] - TOML configuration loading
//! - [`prelude`] - Common re-exports for convenience

pub mod capacitor;
pub mod config;
pub mod consts;
pub mod prelude;
