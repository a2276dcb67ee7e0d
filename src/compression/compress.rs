use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    None,
    Lz4,      // Fast compression (~500 MB/s), ratio 2-3x
}

impl CompressionType {
    pub fn as_u8(self) -> u8 {
        match self {
            CompressionType::None => 0,
            CompressionType::Lz4 => 1,
        }
    }

    pub fn from_u8(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(CompressionType::None),
            1 => Ok(CompressionType::Lz4),
            other => Err(Error::new(
                ErrorKind::Corrupted,
                format!("unknown compression tag {}", other),
            )),
        }
    }
}

/// Compressed payload for persisted snapshots
pub struct CompressedBlock {
    pub data: Vec<u8>,
}

impl CompressedBlock {
    pub fn compress(data: &[u8], compression: CompressionType) -> Self {
        let compressed = match compression {
            CompressionType::None => data.to_vec(),
            // Uncompressed size is prepended so decompression needs no side channel
            CompressionType::Lz4 => lz4_flex::compress_prepend_size(data),
        };

        CompressedBlock { data: compressed }
    }

    pub fn decompress(data: &[u8], compression: CompressionType) -> Result<Vec<u8>> {
        match compression {
            CompressionType::None => Ok(data.to_vec()),

            CompressionType::Lz4 => {
                lz4_flex::decompress_size_prepended(data)
                    .map_err(|e| Error::new(ErrorKind::Corrupted, format!("LZ4: {}", e)))
            }
        }
    }
}
