use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable that relocates the whole config directory
pub const CONFIG_DIR_ENV: &str = "CINESCOPE_CONFIG_DIR";

pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinescope");
        Ok(Self::with_base(base_dir))
    }

    pub fn with_base(base_dir: PathBuf) -> Self {
        Self { config_dir: base_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Self::with_base(PathBuf::from(dir));
            }
        }

        // Platform path (e.g. ~/.config/cinescope on Linux), falling back to the working directory
        Self::new().unwrap_or_else(|_| Self::with_base(PathBuf::from(".cinescope")))
    }
}
