//! Program image loading for the reference machines.
//!
//! Images come from a file on disk or from a byte slice (tests). A caller can
//! bound the size and pin a CRC-32 so a wrong dump is rejected before it is
//! mapped into the address space.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// CRC-32 (private)
// ---------------------------------------------------------------------------

/// CRC-32 lookup table (reflected polynomial 0xEDB88320).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        let index = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    crc ^ 0xFFFF_FFFF
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RomLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The machine needs an image and none was supplied.
    #[error("missing program image: {0}")]
    MissingFile(String),

    #[error("image {file}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },

    #[error("image {file}: CRC32 expected 0x{expected:08X}, got 0x{actual:08X}")]
    ChecksumMismatch {
        file: String,
        expected: u32,
        actual: u32,
    },

    /// The image does not fit the region it is loaded into.
    #[error("image {file}: {actual} bytes does not fit in {limit} bytes")]
    TooLarge {
        file: String,
        limit: usize,
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// RomImage
// ---------------------------------------------------------------------------

/// A named program image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomImage {
    name: String,
    data: Vec<u8>,
}

impl RomImage {
    pub fn from_file(path: &Path) -> Result<Self, RomLoadError> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        debug!(file = %name, len = data.len(), "loaded image");
        Ok(Self { name, data })
    }

    /// Wrap an in-memory image (for testing).
    pub fn from_bytes(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn crc32(&self) -> u32 {
        crc32(&self.data)
    }

    /// Fail unless the image is exactly `expected` bytes.
    pub fn require_size(&self, expected: usize) -> Result<&Self, RomLoadError> {
        if self.data.len() != expected {
            return Err(RomLoadError::SizeMismatch {
                file: self.name.clone(),
                expected,
                actual: self.data.len(),
            });
        }
        Ok(self)
    }

    /// Fail if the image is larger than `limit` bytes.
    pub fn require_fits(&self, limit: usize) -> Result<&Self, RomLoadError> {
        if self.data.len() > limit {
            return Err(RomLoadError::TooLarge {
                file: self.name.clone(),
                limit,
                actual: self.data.len(),
            });
        }
        Ok(self)
    }

    /// Validate against a known checksum. `None` accepts any content.
    pub fn verify(&self, expected: Option<u32>) -> Result<&Self, RomLoadError> {
        if let Some(expected) = expected {
            let actual = self.crc32();
            if actual != expected {
                return Err(RomLoadError::ChecksumMismatch {
                    file: self.name.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(self)
    }

    /// Copy the image into a region of `size` bytes, padding with `fill`.
    pub fn to_region(&self, size: usize, fill: u8) -> Result<Vec<u8>, RomLoadError> {
        self.require_fits(size)?;
        let mut region = vec![fill; size];
        region[..self.data.len()].copy_from_slice(&self.data);
        Ok(region)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
