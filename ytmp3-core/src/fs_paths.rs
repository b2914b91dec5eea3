use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "ytmp3";

pub trait AppPaths: Send + Sync {
    fn config_file(&self) -> PathBuf;
    fn data_dir(&self) -> PathBuf;
    fn bin_dir(&self) -> PathBuf {
        self.data_dir().join("bin")
    }
}

/// Platform directories, with `YTMP3_CONFIG` and `YTMP3_DATA_DIR` taking
/// precedence when set.
pub struct DesktopPaths;

impl AppPaths for DesktopPaths {
    fn config_file(&self) -> PathBuf {
        if let Ok(path) = std::env::var("YTMP3_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("settings.json")
    }

    fn data_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var("YTMP3_DATA_DIR") {
            return PathBuf::from(dir);
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
