//! Profile table storage.
//!
//! Lets users override the built-in profiles with a `profiles.json` file.
//! Cross-platform: uses appropriate config directories for each OS.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ProfileSpec, ThermalProfile, build_profiles, default_profile_specs};
use crate::error::{Result, ThermalError};

// =============================================================================
// Config Path
// =============================================================================

const APP_NAME: &str = "rog-thermal";
const PROFILES_FILE: &str = "profiles.json";

/// Get the configuration directory path.
/// - Linux: ~/.config/rog-thermal/
/// - Windows: %APPDATA%\rog-thermal\
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or_else(|| ThermalError::Config("Could not find config directory".into()))
}

/// Get the full path to the profiles file.
pub fn get_profiles_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(PROFILES_FILE))
}

// =============================================================================
// Storage Structures
// =============================================================================

/// On-disk profile table. Order of `profiles` is the cycling order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTable {
    pub profiles: Vec<ProfileSpec>,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            profiles: default_profile_specs(),
        }
    }
}

// =============================================================================
// Storage Functions
// =============================================================================

/// Load a profile table from `path`.
pub fn load_table(path: &Path) -> Result<ProfileTable> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ThermalError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| ThermalError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Save a profile table to `path`, creating parent directories.
pub fn save_table(path: &Path, table: &ProfileTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ThermalError::Config(format!("Failed to create config dir: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(table)
        .map_err(|e| ThermalError::Config(format!("Failed to serialize profiles: {}", e)))?;

    std::fs::write(path, content)
        .map_err(|e| ThermalError::Config(format!("Failed to write {}: {}", path.display(), e)))
}

/// Load and parse profiles from `path`, or the built-in table if it is missing.
pub fn load_profiles_from(path: &Path) -> Result<Vec<ThermalProfile>> {
    let table = if path.exists() {
        log::debug!("loading profiles from {}", path.display());
        load_table(path)?
    } else {
        log::debug!("{} not found, using built-in profiles", path.display());
        ProfileTable::default()
    };

    build_profiles(&table.profiles)
}

/// Load profiles from the user config directory, falling back to the built-in table.
pub fn load_profiles_or_default() -> Result<Vec<ThermalProfile>> {
    load_profiles_from(&get_profiles_path()?)
}

/// Ensure the profiles file exists, writing the built-in table if missing.
pub fn ensure_profiles_exist() -> Result<PathBuf> {
    let path = get_profiles_path()?;
    if !path.exists() {
        save_table(&path, &ProfileTable::default())?;
        log::info!("created default profiles at {}", path.display());
    }
    Ok(path)
}
