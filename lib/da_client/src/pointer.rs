use std::fmt;

use nubit_nmt::HASH_SIZE;

/// Version of the blob pointer layout produced by [`BlobPointer::to_bytes()`].
pub const BLOB_POINTER_VERSION: u8 = 0;
/// Size of a serialized blob pointer: version, data root and three `u64` fields.
pub const BLOB_POINTER_SIZE: usize = 1 + HASH_SIZE + 3 * 8;

/// Blob pointer cannot be decoded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointerError {
    #[error("blob pointer is {len} bytes long, expected {BLOB_POINTER_SIZE}")]
    InvalidLength { len: usize },
    #[error("unsupported blob pointer version {0}")]
    UnsupportedVersion(u8),
    #[error("invalid row range {start_row}..={end_row} for square of size {square_size}")]
    InvalidRowRange {
        start_row: u64,
        end_row: u64,
        square_size: u64,
    },
}

/// Reference to a blob stored on Nubit DA.
///
/// # Layout
///
/// Version 0 has a fixed size of [`BLOB_POINTER_SIZE`] bytes, integers are big-endian:
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0 | 1 | Layout version (`0`) |
/// | 1 | 32 | Data root |
/// | 33 | 8 | Square size |
/// | 41 | 8 | Start row (inclusive) |
/// | 49 | 8 | End row (inclusive) |
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlobPointer {
    /// Root committing to the whole extended data square.
    pub data_root: [u8; HASH_SIZE],
    /// Width of the extended data square.
    pub square_size: u64,
    /// First row containing the blob.
    pub start_row: u64,
    /// Last row containing the blob.
    pub end_row: u64,
}

impl fmt::Debug for BlobPointer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BlobPointer")
            .field("data_root", &hex::encode(self.data_root))
            .field("square_size", &self.square_size)
            .field("start_row", &self.start_row)
            .field("end_row", &self.end_row)
            .finish()
    }
}

impl BlobPointer {
    /// Number of rows spanned by the blob, or `None` if the row range is inverted.
    pub fn row_count(&self) -> Option<u64> {
        self.end_row
            .checked_sub(self.start_row)
            .and_then(|diff| diff.checked_add(1))
    }

    /// Serializes this pointer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(BLOB_POINTER_SIZE);
        bytes.push(BLOB_POINTER_VERSION);
        bytes.extend_from_slice(&self.data_root);
        bytes.extend_from_slice(&self.square_size.to_be_bytes());
        bytes.extend_from_slice(&self.start_row.to_be_bytes());
        bytes.extend_from_slice(&self.end_row.to_be_bytes());
        bytes
    }

    /// Deserializes a pointer produced by [`Self::to_bytes()`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PointerError> {
        let Some((&version, body)) = bytes.split_first() else {
            return Err(PointerError::InvalidLength { len: 0 });
        };
        if version != BLOB_POINTER_VERSION {
            return Err(PointerError::UnsupportedVersion(version));
        }
        if bytes.len() != BLOB_POINTER_SIZE {
            return Err(PointerError::InvalidLength { len: bytes.len() });
        }

        let (data_root_bytes, fields) = body.split_at(HASH_SIZE);
        let mut data_root = [0_u8; HASH_SIZE];
        data_root.copy_from_slice(data_root_bytes);
        let read_u64 = |index: usize| {
            let mut buffer = [0_u8; 8];
            buffer.copy_from_slice(&fields[index * 8..(index + 1) * 8]);
            u64::from_be_bytes(buffer)
        };

        let pointer = Self {
            data_root,
            square_size: read_u64(0),
            start_row: read_u64(1),
            end_row: read_u64(2),
        };
        if pointer.start_row > pointer.end_row || pointer.end_row >= pointer.square_size {
            return Err(PointerError::InvalidRowRange {
                start_row: pointer.start_row,
                end_row: pointer.end_row,
                square_size: pointer.square_size,
            });
        }
        Ok(pointer)
    }
}
