//! Path resolution for device-local trolley storage.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DataDirNotFound => write!(f, "Cannot find platform data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for trolley storage.
///
/// # Directory Structure
///
/// ```text
/// ~/.local/share/trolley/       # Data directory (Linux; platform-specific elsewhere)
/// └── _trolley_cart             # Persisted cart list (FileKeyValueStore)
/// ```
pub struct TrolleyPaths;

impl TrolleyPaths {
    /// Returns the trolley data directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the data directory (e.g., `~/.local/share/trolley/`)
    /// - `Err(PathError::DataDirNotFound)`: Could not determine directory
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("trolley"))
            .ok_or(PathError::DataDirNotFound)
    }
}
