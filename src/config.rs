// SPDX-License-Identifier: GPL-3.0-only
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::source::{Backend, DRM_ROOT};

pub const APPID: &str = "monitorinfo";
pub const CONFIG_VERSION: u64 = 1;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub version: u64,
    pub backend: Backend,
    pub drm_root: PathBuf,
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
    /// Also report OS, hardware, BIOS, CPU and kernel
    pub system_info: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: Backend::default(),
            drm_root: PathBuf::from(DRM_ROOT),
            log_filter: None,
            system_info: true,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/monitorinfo/config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APPID).join("config.toml"))
    }

    /// Load the user config. A missing file gives the defaults.
    pub fn load() -> anyhow::Result<Self> {
        match Self::path() {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("can't read {}", path.display()));
            }
        };

        let config: Self =
            toml::from_str(&content).with_context(|| format!("can't parse {}", path.display()))?;

        if config.version != CONFIG_VERSION {
            tracing::warn!(
                "config version {} differs from {}, unknown keys are ignored",
                config.version,
                CONFIG_VERSION
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            drm_root = "/tmp/drm"
            system_info = false
            "#,
        )
        .unwrap();

        assert_eq!(config.drm_root, PathBuf::from("/tmp/drm"));
        assert!(!config.system_info);
        assert_eq!(config.backend, Backend::Sysfs);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("monitorinfo-no-such-config.toml");
        assert_eq!(Config::from_path(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file() {
        let path = std::env::temp_dir()
            .join(format!("monitorinfo-bad-config-{}.toml", std::process::id()));
        fs::write(&path, "backend = \"vga\"").unwrap();

        let err = Config::from_path(&path).unwrap_err();
        assert!(err.to_string().starts_with("can't parse"));

        fs::remove_file(&path).unwrap();
    }
}
