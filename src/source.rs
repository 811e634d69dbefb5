// SPDX-License-Identifier: GPL-3.0-only
//! Where raw EDID blocks come from
//!
//! Every backend yields a list of named sources, one per display or
//! connector. Reading a source returns at most one base block worth of bytes.

use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{config::Config, edid::EDID_BLOCK_LEN};

/// Default DRM class directory holding one subdirectory per connector
pub const DRM_ROOT: &str = "/sys/class/drm";

/// A provider of one candidate EDID block
pub trait EdidSource {
    /// Human-readable origin, used in logs
    fn name(&self) -> &str;

    /// Read up to 128 bytes
    fn read_block(&self) -> io::Result<Vec<u8>>;
}

impl<S: EdidSource + ?Sized> EdidSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_block(&self) -> io::Result<Vec<u8>> {
        (**self).read_block()
    }
}

/// Discovery backend, selected in the config file
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `edid` files exported by the kernel's DRM connectors
    #[default]
    Sysfs,
    /// EDID reported over DDC/CI
    Ddc,
}

impl Backend {
    pub fn discover(self, config: &Config) -> Vec<Box<dyn EdidSource>> {
        match self {
            Backend::Sysfs => discover_sysfs(&config.drm_root)
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn EdidSource>)
                .collect(),
            Backend::Ddc => discover_ddc()
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn EdidSource>)
                .collect(),
        }
    }
}

/// `<drm_root>/<connector>/edid`
#[derive(Debug, Clone)]
pub struct SysfsEdid {
    connector: String,
    path: PathBuf,
}

impl SysfsEdid {
    pub fn new(connector: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            connector: connector.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EdidSource for SysfsEdid {
    fn name(&self) -> &str {
        &self.connector
    }

    fn read_block(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(EDID_BLOCK_LEN);
        File::open(&self.path)?
            .take(EDID_BLOCK_LEN as u64)
            .read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// All connectors under `root` exposing an `edid` file, sorted by connector name.
///
/// A missing or unreadable root gives an empty list.
pub fn discover_sysfs(root: &Path) -> Vec<SysfsEdid> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut sources: Vec<SysfsEdid> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path().join("edid");
            path.is_file().then(|| {
                SysfsEdid::new(entry.file_name().to_string_lossy().into_owned(), path)
            })
        })
        .collect();

    sources.sort_by(|a, b| a.connector.cmp(&b.connector));

    tracing::debug!(
        "Found {} EDID source(s) under {}",
        sources.len(),
        root.display()
    );

    sources
}

/// EDID bytes captured by `ddc-hi` while enumerating a display
#[derive(Debug, Clone)]
pub struct DdcEdid {
    id: String,
    data: Option<Vec<u8>>,
}

impl DdcEdid {
    pub fn new(id: impl Into<String>, data: Option<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

impl EdidSource for DdcEdid {
    fn name(&self) -> &str {
        &self.id
    }

    fn read_block(&self) -> io::Result<Vec<u8>> {
        let data = self.data.as_deref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "display reported no EDID")
        })?;
        Ok(data[..data.len().min(EDID_BLOCK_LEN)].to_vec())
    }
}

pub fn discover_ddc() -> Vec<DdcEdid> {
    let sources: Vec<DdcEdid> = ddc_hi::Display::enumerate()
        .iter()
        .map(|display| DdcEdid::new(display.info.id.clone(), display.info.edid_data.clone()))
        .collect();

    tracing::debug!("Found {} DDC display(s)", sources.len());

    sources
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::edid::tests::block_with;

    /// Scratch directory shaped like /sys/class/drm, removed on drop
    pub(crate) struct FakeDrm(pub PathBuf);

    impl FakeDrm {
        pub(crate) fn new(name: &str) -> Self {
            let root = std::env::temp_dir()
                .join(format!("monitorinfo-{}-{}", name, std::process::id()));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            Self(root)
        }

        /// Connector directory without an `edid` file
        pub(crate) fn bare(&self, name: &str) -> PathBuf {
            let dir = self.0.join(name);
            fs::create_dir_all(&dir).unwrap();
            dir
        }

        pub(crate) fn connector(&self, name: &str, edid: &[u8]) {
            fs::write(self.bare(name).join("edid"), edid).unwrap();
        }
    }

    impl Drop for FakeDrm {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_discover_sysfs() {
        let drm = FakeDrm::new("discover");
        drm.connector("card1-HDMI-A-1", &block_with("B", ""));
        drm.connector("card1-DP-1", &block_with("A", ""));
        // no edid file
        drm.bare("card1");
        drm.bare("version");

        let names: Vec<_> = discover_sysfs(&drm.0)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["card1-DP-1", "card1-HDMI-A-1"]);
    }

    #[test]
    fn test_missing_root() {
        let drm = FakeDrm::new("missing");
        assert!(discover_sysfs(&drm.0.join("nope")).is_empty());
    }

    #[test]
    fn test_sysfs_read_is_capped() {
        let drm = FakeDrm::new("capped");
        let mut with_extension = block_with("EXT", "");
        with_extension.extend_from_slice(&[0x02; 128]);
        drm.connector("card0-DP-2", &with_extension);

        let source = &discover_sysfs(&drm.0)[0];
        assert_eq!(source.read_block().unwrap(), block_with("EXT", ""));
    }

    #[test]
    fn test_ddc_source() {
        let missing = DdcEdid::new("i2c-4", None);
        assert_eq!(
            missing.read_block().unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        let long = DdcEdid::new("i2c-5", Some(vec![7; 256]));
        assert_eq!(long.read_block().unwrap().len(), EDID_BLOCK_LEN);
    }

    #[test]
    fn test_backend_from_config() {
        let config: Config = toml::from_str("backend = \"ddc\"").unwrap();
        assert_eq!(config.backend, Backend::Ddc);
        assert_eq!(Config::default().backend, Backend::Sysfs);
    }
}
