//! Collaborator interfaces for the platform.
//!
//! The ACPI control channel and the OS power plan switcher are provided by
//! the host application.

pub mod channel;
pub mod power;

pub use channel::ControlChannel;
pub use power::PowerPlanSwitcher;
