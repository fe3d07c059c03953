//! Profile storage and persistence module.
//!
//! Handles saving and loading the profile table to/from disk.

pub mod profiles;

// Re-export commonly used items
pub use profiles::*;
