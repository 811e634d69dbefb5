// SPDX-License-Identifier: GPL-3.0-only
//! Machine identity and connected display report
//!
//! Displays are identified by decoding the EDID base block each one exposes.
//! [`monitors`] is the entry point used by the binary.

pub mod config;
pub mod edid;
pub mod localize;
pub mod monitor;
pub mod source;
pub mod sysinfo;

use config::Config;
use monitor::MonitorIdentity;

/// Identities of all attached displays found by the configured backend
pub fn monitors(config: &Config) -> Vec<MonitorIdentity> {
    monitor::enumerate(config.backend.discover(config))
}
