//! ATK ACPI protocol implementation for ASUS ROG laptops.
//!
//! This module contains the fixed-layout command buffers for the throttle
//! plan and fan-curve settings, and the builders that fill them in.

pub mod commands;

pub use commands::*;
