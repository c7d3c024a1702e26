//! Client-side definitions of the Nubit DA blob pointer protocol.
//!
//! A batch message posted on the host chain may carry a [`BlobPointer`] instead of the batch
//! payload. The pointer is marked by a header byte (see [`header`]) and references a blob stored
//! on Nubit DA together with the data root committing to it.
//!
//! The DA transport is consumed only through the narrow [`BlobReader`] and [`BlobWriter`]
//! capabilities; [`DataAvailabilityReader`] and [`DataAvailabilityWriter`] are the traits exposed
//! to the batch-processing pipeline.

use std::fmt;

use async_trait::async_trait;
pub use nubit_nmt::PreimageRecorder;

pub use crate::{
    header::{
        encode_pointer_message, is_nubit_message_header_byte, parse_pointer_message,
        NUBIT_MESSAGE_HEADER_FLAG, SEQUENCER_MESSAGE_HEADER_LEN,
    },
    pointer::{BlobPointer, PointerError, BLOB_POINTER_SIZE, BLOB_POINTER_VERSION},
};
use crate::types::{DAError, FetchedBlob, RecoveryError, StoreError};

pub mod header;
mod pointer;
pub mod types;

/// Fetch and proof capability of a DA transport.
#[async_trait]
pub trait BlobReader: Sync + Send + fmt::Debug {
    /// Fetches the payload referenced by `pointer` together with the square data needed to verify it.
    /// An empty payload without an error means that the batch is provably empty (e.g., it was
    /// discarded upstream).
    async fn read(&self, pointer: &BlobPointer) -> Result<FetchedBlob, DAError>;

    /// Returns a proof for the message. The proof is opaque to this crate.
    async fn get_proof(&self, msg: &[u8]) -> Result<Vec<u8>, DAError>;
}

/// Submit capability of a DA transport.
#[async_trait]
pub trait BlobWriter: Sync + Send + fmt::Debug {
    /// Submits the payload and returns the commitment bytes issued by the DA network.
    async fn store(&self, payload: Vec<u8>) -> Result<Vec<u8>, DAError>;
}

/// Reader side of a DA provider, as consumed by the batch-processing pipeline.
#[async_trait]
pub trait DataAvailabilityReader: Sync + Send + fmt::Debug {
    /// Checks whether the header byte of a batch message is handled by this reader.
    fn is_valid_header_byte(&self, header: u8) -> bool;

    /// Recovers the payload of a batch from its sequencer message.
    ///
    /// Malformed messages yield an empty payload. Errors are returned only if the data couldn't
    /// be fetched or failed verification.
    async fn recover_payload_from_batch(
        &self,
        batch_number: u64,
        sequencer_msg: &[u8],
        preimages: Option<&mut dyn PreimageRecorder>,
    ) -> Result<Vec<u8>, RecoveryError>;

    /// Forwards a proof request to the underlying transport.
    async fn get_proof(&self, msg: &[u8]) -> Result<Vec<u8>, DAError>;
}

/// Writer side of a DA provider, as consumed by the batch poster.
#[async_trait]
pub trait DataAvailabilityWriter: Sync + Send + fmt::Debug {
    /// Stores the payload and returns the commitment bytes. If `fallback_disabled` is set,
    /// a failure is reported as [`StoreError::NoFallbackAvailable`].
    async fn store(&self, payload: Vec<u8>, fallback_disabled: bool)
        -> Result<Vec<u8>, StoreError>;

    /// Name of this writer for logs and metrics.
    fn name(&self) -> &'static str;
}
