// Storage path utilities.
// Resolves where the settings and project cache files live.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Settings document file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// Project cache document file name.
pub const CACHE_FILE: &str = "cache-projects.json";

/// Debug log file name, placed in the system temp dir by default.
pub const LOG_FILE: &str = "rw-debug.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "redmine-workflow")
}

/// Default directory for persistent workflow data (settings).
pub fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default directory for volatile workflow data (project cache).
pub fn default_cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default debug log location.
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE)
}

/// Path to the settings file inside a data directory.
pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE)
}

/// Path to the project cache file inside a cache directory.
pub fn cache_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_FILE)
}
