// SPDX-License-Identifier: GPL-3.0-only
//! Machine identity shown next to the display list

use std::{fs, path::Path};

const OS_RELEASE: &str = "/etc/os-release";
const PRODUCT_NAME: &str = "/sys/devices/virtual/dmi/id/product_name";
const BIOS_VERSION: &str = "/sys/devices/virtual/dmi/id/bios_version";
const CPUINFO: &str = "/proc/cpuinfo";
const KERNEL_VERSION: &str = "/proc/version";

/// Each field is `None` when its source could not be read or parsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub os: Option<String>,
    pub hardware_model: Option<String>,
    pub bios_version: Option<String>,
    pub cpu_model: Option<String>,
    pub kernel_version: Option<String>,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            os: read(OS_RELEASE).and_then(|s| os_pretty_name(&s)),
            hardware_model: read(PRODUCT_NAME).and_then(non_empty),
            bios_version: read(BIOS_VERSION).and_then(non_empty),
            cpu_model: read(CPUINFO).and_then(|s| cpu_model(&s)),
            kernel_version: read(KERNEL_VERSION).and_then(non_empty),
        }
    }
}

fn read(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", path.display(), e);
            None
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// `PRETTY_NAME` from os-release(5) content
pub fn os_pretty_name(os_release: &str) -> Option<String> {
    os_release
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == "PRETTY_NAME")
        .and_then(|(_, value)| non_empty(value.trim().trim_matches(['"', '\'']).to_string()))
}

/// First `model name` entry of /proc/cpuinfo
pub fn cpu_model(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "model name")
        .and_then(|(_, value)| non_empty(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_pretty_name() {
        let os_release = "NAME=\"Ubuntu\"\n\
                          VERSION_ID=\"24.04\"\n\
                          PRETTY_NAME=\"Ubuntu 24.04.1 LTS\"\n\
                          HOME_URL=\"https://www.ubuntu.com/\"\n";
        assert_eq!(
            os_pretty_name(os_release).as_deref(),
            Some("Ubuntu 24.04.1 LTS")
        );
        assert_eq!(os_pretty_name("NAME=Arch\n"), None);
        assert_eq!(os_pretty_name("PRETTY_NAME=\"\"\n"), None);
    }

    #[test]
    fn test_value_with_equals_sign() {
        assert_eq!(
            os_pretty_name("PRETTY_NAME='Distro a=b'").as_deref(),
            Some("Distro a=b")
        );
    }

    #[test]
    fn test_cpu_model() {
        let cpuinfo = "processor\t: 0\n\
                       vendor_id\t: GenuineIntel\n\
                       model name\t: Intel(R) Core(TM) i7-1185G7 @ 3.00GHz\n\
                       \n\
                       processor\t: 1\n\
                       model name\t: Intel(R) Core(TM) i7-1185G7 @ 3.00GHz\n";
        assert_eq!(
            cpu_model(cpuinfo).as_deref(),
            Some("Intel(R) Core(TM) i7-1185G7 @ 3.00GHz")
        );
        assert_eq!(cpu_model("processor\t: 0\n"), None);
    }
}
