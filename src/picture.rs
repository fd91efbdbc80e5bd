//! Picture index
//!
//! The picture file is a run of records, each headed by
//! `[code bits 11..4] [code bits 3..0 | length bits 11..8] [length bits 7..0]`
//! where the length covers the whole record. A first byte with the high bit
//! set ends the file.

use crate::error::VmError;
use log::debug;

/// Size of the picture blob
pub const PICTURE_SIZE: usize = 8192;

/// Shortest file accepted as picture data
pub const MIN_PICTURE_SIZE: usize = 1024;

const HEADER_LEN: usize = 3;

pub struct PictureData {
    bytes: Vec<u8>,
}

impl PictureData {
    /// Wrap raw picture file contents, padding or truncating to the fixed size
    pub fn from_bytes(mut bytes: Vec<u8>) -> Result<Self, VmError> {
        if bytes.len() < MIN_PICTURE_SIZE {
            return Err(VmError::Load(format!(
                "Invalid picture data ({} bytes)",
                bytes.len()
            )));
        }
        bytes.resize(PICTURE_SIZE, 0);
        Ok(PictureData { bytes })
    }

    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of the body of the record with this 12-bit code
    pub fn find(&self, code: u16) -> Option<usize> {
        let high = ((code >> 4) & 0xFF) as u8;
        let low = ((code & 0x0F) << 4) as u8;
        let mut p = 0usize;
        loop {
            let c = self.byte(p)?;
            let cl = self.byte(p + 1)?;
            if c & 0x80 != 0 {
                debug!("picture {} not found", code);
                return None;
            }
            if c == high && cl & 0xF0 == low {
                return Some(p + HEADER_LEN);
            }
            let len = (((cl & 0x0F) as usize) << 8) | self.byte(p + 2)? as usize;
            if len < HEADER_LEN {
                debug!("picture record at {:04x} has length {}", p, len);
                return None;
            }
            p += len;
        }
    }
}
