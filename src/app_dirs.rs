use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "stenoscore";

/// Where results and logs live: `~/.local/state/stenoscore` when `HOME` is
/// set, the platform data dir otherwise.
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn history_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("results.csv"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("stenoscore.log"))
    }

    pub fn config_path() -> PathBuf {
        match ProjectDirs::from("", "", APP_NAME) {
            Some(dirs) => dirs.config_dir().join("config.json"),
            None => PathBuf::from("stenoscore_config.json"),
        }
    }
}
