//! Thermal profile cycling.
//!
//! Sequences throttle plan, fan curve and power plan changes for each profile.

mod manager;

pub use manager::ThermalManager;
