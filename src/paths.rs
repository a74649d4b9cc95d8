//! Path utilities and file system helpers

use crate::error::ConfigError;
use std::path::PathBuf;

/// Application folder name under the platform data directory
pub const APP_DIR_NAME: &str = "com.plantgallery.app";

/// Gets the application data directory
pub fn get_app_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|p| p.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoDataDir)
}

/// Gets the configuration file path
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_app_data_dir().map(|p| p.join("config.json"))
}

/// Gets the default care data file path
pub fn get_care_data_path() -> Result<PathBuf, ConfigError> {
    get_app_data_dir().map(|p| p.join("plant_care.json"))
}
