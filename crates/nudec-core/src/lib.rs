//! # nudec-core
//! Foundation types, constants, and the engine trait for the sterile-neutrino
//! decay drivers.

pub mod constants;
pub mod error;
pub mod params;
pub mod traits;
pub mod types;
