use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where a per-game history file lives. Falls back to the working
    /// directory when no platform data directory can be resolved.
    pub fn history_path(file_name: &str) -> PathBuf {
        ProjectDirs::from("", "", "leapling")
            .map(|proj_dirs| proj_dirs.data_local_dir().join(file_name))
            .unwrap_or_else(|| PathBuf::from(file_name))
    }
}
