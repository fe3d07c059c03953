//! ROG Thermal Library
//!
//! Thermal profile control for ASUS ROG laptops through the vendor ATK ACPI
//! interface.
//!
//! # Features
//!
//! - Parse fan curves (`39c:0%,79c:31%,...`) into firmware fan tables
//! - Build throttle plan and fan-curve command buffers
//! - Cycle through named profiles, applying throttle plan, fan curves and
//!   OS power plan in a fixed order
//!
//! # Example
//!
//! ```no_run
//! use rog_thermal::device::{ControlChannel, PowerPlanSwitcher};
//! use rog_thermal::thermal::ThermalManager;
//!
//! fn cycle(
//!     channel: impl ControlChannel,
//!     power: impl PowerPlanSwitcher,
//! ) -> Result<(), Box<dyn std::error::Error>> {
//!     rog_thermal::logging::setup(1)?;
//!
//!     // Built-in profiles, or the user's profiles.json if present
//!     let profiles = rog_thermal::storage::load_profiles_or_default()?;
//!     let mut thermal = ThermalManager::new(channel, power, profiles)?;
//!
//!     let name = thermal.next_profile()?;
//!     println!("Thermal profile: {}", name);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cooling;
pub mod device;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod storage;
pub mod thermal;

// Re-exports for convenience
pub use config::ThermalProfile;
pub use cooling::FanCurve;
pub use error::{Result, ThermalError};
pub use protocol::{FanDevice, ThrottlePlan};
pub use thermal::ThermalManager;
