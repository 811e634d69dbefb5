// SPDX-License-Identifier: GPL-3.0-only
//! EDID 1.x base block decoding
//!
//! Validates a 128-byte base block (length, checksum, header, in that order)
//! and extracts the display product name and serial number text descriptors.
//! Extension blocks are never read; the extension flag is only reported.

use thiserror::Error;

/// Size of an EDID base block in bytes
pub const EDID_BLOCK_LEN: usize = 128;

/// Fixed header every EDID base block starts with
pub const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Display descriptor tag: display product name
pub const TAG_PRODUCT_NAME: u8 = 0xFC;

/// Display descriptor tag: display product serial number
pub const TAG_SERIAL_NUMBER: u8 = 0xFF;

const DESCRIPTOR_LEN: usize = 18;
const DESCRIPTOR_OFFSET: usize = 54;
const DESCRIPTOR_COUNT: usize = 4;

/// Text payload of a display descriptor (bytes 5..17)
const DESCRIPTOR_TEXT: std::ops::Range<usize> = 5..17;

/// Why a byte block was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The block is not exactly 128 bytes long
    #[error("EDID block must be 128 bytes, got {0}")]
    MalformedLength(usize),

    /// The bytes do not sum to 0 mod 256; carries the residual sum
    #[error("EDID checksum mismatch (byte sum is {0:#04x}, expected 0x00)")]
    ChecksumMismatch(u8),

    /// Length and checksum are fine but the block does not start with the EDID header
    #[error("invalid EDID header")]
    InvalidHeader,
}

/// Exactly 128 bytes of candidate EDID data
#[derive(Clone, PartialEq, Eq)]
pub struct RawEdidBlock([u8; EDID_BLOCK_LEN]);

impl RawEdidBlock {
    pub fn as_bytes(&self) -> &[u8; EDID_BLOCK_LEN] {
        &self.0
    }

    /// Sum of all bytes mod 256. Zero for a valid block.
    pub fn checksum_residual(&self) -> u8 {
        self.0.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }
}

impl TryFrom<&[u8]> for RawEdidBlock {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; EDID_BLOCK_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| DecodeError::MalformedLength(bytes.len()))
    }
}

impl std::fmt::Debug for RawEdidBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawEdidBlock(")?;
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..)")
    }
}

/// One of the four 18-byte detailed timing / display descriptor slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor([u8; DESCRIPTOR_LEN]);

impl Descriptor {
    pub fn as_bytes(&self) -> &[u8; DESCRIPTOR_LEN] {
        &self.0
    }

    /// A zero pixel clock (bytes 0-1) marks a display descriptor rather than a timing
    pub fn is_display_descriptor(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0
    }

    pub fn tag(&self) -> Option<u8> {
        self.is_display_descriptor().then_some(self.0[3])
    }

    /// Text payload, trimmed of padding, whitespace and control characters
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0[DESCRIPTOR_TEXT])
            .trim_matches(|c: char| c.is_whitespace() || c.is_control())
            .to_string()
    }
}

/// Field view over a validated EDID base block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdidRecord {
    pub header: [u8; 8],
    pub manufacturer_id: u16,
    pub product_id: u16,
    pub serial_number: u32,
    pub manufacture_week: u8,
    pub manufacture_year: u8,
    pub edid_version: u8,
    pub edid_revision: u8,
    pub input_type: u8,
    pub width_cm: u8,
    pub height_cm: u8,
    pub gamma: u8,
    pub features: u8,
    pub color_characteristics: [u8; 10],
    pub supported_timings: u16,
    pub reserved_timing: u8,
    pub standard_timings: [u8; 16],
    pub descriptors: [Descriptor; DESCRIPTOR_COUNT],
    pub extension_flag: u8,
    pub checksum: u8,
}

impl EdidRecord {
    /// Validate and split a candidate block.
    ///
    /// Checks run cheapest first: length, checksum over all 128 bytes, header.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let block = RawEdidBlock::try_from(bytes)?;

        let residual = block.checksum_residual();
        if residual != 0 {
            return Err(DecodeError::ChecksumMismatch(residual));
        }

        let b = block.as_bytes();
        if b[..8] != EDID_HEADER {
            return Err(DecodeError::InvalidHeader);
        }

        let mut header = [0u8; 8];
        header.copy_from_slice(&b[0..8]);
        let mut color_characteristics = [0u8; 10];
        color_characteristics.copy_from_slice(&b[25..35]);
        let mut standard_timings = [0u8; 16];
        standard_timings.copy_from_slice(&b[38..54]);

        let descriptors = std::array::from_fn(|slot| {
            let start = DESCRIPTOR_OFFSET + slot * DESCRIPTOR_LEN;
            let mut raw = [0u8; DESCRIPTOR_LEN];
            raw.copy_from_slice(&b[start..start + DESCRIPTOR_LEN]);
            Descriptor(raw)
        });

        Ok(Self {
            header,
            manufacturer_id: u16::from_le_bytes([b[8], b[9]]),
            product_id: u16::from_le_bytes([b[10], b[11]]),
            serial_number: u32::from_le_bytes([b[12], b[13], b[14], b[15]]),
            manufacture_week: b[16],
            manufacture_year: b[17],
            edid_version: b[18],
            edid_revision: b[19],
            input_type: b[20],
            width_cm: b[21],
            height_cm: b[22],
            gamma: b[23],
            features: b[24],
            color_characteristics,
            supported_timings: u16::from_le_bytes([b[35], b[36]]),
            reserved_timing: b[37],
            standard_timings,
            descriptors,
            extension_flag: b[126],
            checksum: b[127],
        })
    }

    /// First text descriptor with `tag`, scanning slots 2, 3 and 4.
    /// Slot 1 is never considered.
    pub fn descriptor_text(&self, tag: u8) -> Option<String> {
        self.descriptors[1..]
            .iter()
            .find(|d| d.tag() == Some(tag))
            .map(Descriptor::text)
    }

    /// Model and serial text; absent descriptors give empty strings
    pub fn identity(&self) -> MonitorIdentity {
        MonitorIdentity {
            model: self.descriptor_text(TAG_PRODUCT_NAME).unwrap_or_default(),
            serial: self.descriptor_text(TAG_SERIAL_NUMBER).unwrap_or_default(),
        }
    }

    /// Three-letter PNP vendor code.
    ///
    /// The letters are packed as 5-bit values in the big-endian reading of
    /// bytes 8-9, so the little-endian `manufacturer_id` is swapped first.
    pub fn manufacturer_code(&self) -> Option<String> {
        let packed = self.manufacturer_id.swap_bytes();
        [10, 5, 0]
            .into_iter()
            .map(|shift| match ((packed >> shift) & 0x1F) as u8 {
                n @ 1..=26 => Some(char::from(b'A' + n - 1)),
                _ => None,
            })
            .collect()
    }

    pub fn manufacture_year(&self) -> u16 {
        1990 + u16::from(self.manufacture_year)
    }

    pub fn version(&self) -> (u8, u8) {
        (self.edid_version, self.edid_revision)
    }

    /// `None` when the gamma byte is 0xFF (defined in an extension)
    pub fn gamma(&self) -> Option<f32> {
        (self.gamma != 0xFF).then(|| (f32::from(self.gamma) + 100.0) / 100.0)
    }

    /// Number of extension blocks announced. They are not decoded.
    pub fn extension_count(&self) -> u8 {
        self.extension_flag
    }
}

/// Model and serial text of one display. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MonitorIdentity {
    pub model: String,
    pub serial: String,
}

/// Decode a candidate block into the display's model and serial text
pub fn decode(bytes: &[u8]) -> Result<MonitorIdentity, DecodeError> {
    EdidRecord::parse(bytes).map(|record| record.identity())
}
