// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for Echo renderer tools.
//!
//! Each key is one `<key>.json` file under a base directory: the platform
//! config directory by default, or any directory given explicitly.

use directories::ProjectDirs;
use echo_app_core::config::{ConfigError, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Store configs as JSON files under a base directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/echo-scene`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "echo-scene")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::with_base(proj.config_dir())
    }

    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn with_base(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory the config files live in.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// File backing `key`. Keys must not contain path separators.
    fn path_for(&self, key: &str) -> Result<PathBuf, ConfigError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(ConfigError::Other(format!("invalid config key `{key}`")));
        }
        Ok(self.base.join(format!("{key}.json")))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.base)?;
        // Staged write; the rename swaps the file in whole.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, data)?;
        fs::rename(staging, path)?;
        Ok(())
    }
}
