// SPDX-License-Identifier: GPL-3.0-only
use crate::{edid, source::EdidSource};

pub use crate::edid::MonitorIdentity;

impl MonitorIdentity {
    /// Model text, or `placeholder` when the display did not report one
    pub fn model_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        non_empty_or(&self.model, placeholder)
    }

    /// Serial text, or `placeholder` when the display did not report one
    pub fn serial_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        non_empty_or(&self.serial, placeholder)
    }
}

fn non_empty_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

/// Decode every source in order, skipping those that can't be read or decoded.
pub fn enumerate<I>(sources: I) -> Vec<MonitorIdentity>
where
    I: IntoIterator,
    I::Item: EdidSource,
{
    let mut res = Vec::new();

    for source in sources {
        let data = match source.read_block() {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!("Failed to read EDID from {}: {}", source.name(), err);
                continue;
            }
        };

        match edid::decode(&data) {
            Ok(identity) => {
                tracing::debug!(
                    "{}: model={:?} serial={:?}",
                    source.name(),
                    identity.model,
                    identity.serial
                );
                res.push(identity);
            }
            Err(err) => tracing::debug!("Skipping {}: {}", source.name(), err),
        }
    }

    res
}
