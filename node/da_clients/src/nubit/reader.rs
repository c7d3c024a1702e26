use std::sync::Arc;

use async_trait::async_trait;
use nubit_da_client::{
    is_nubit_message_header_byte, parse_pointer_message,
    types::{DAError, FetchedBlob, RecoveryError, VerificationError},
    BlobReader, DataAvailabilityReader, PreimageRecorder,
};

use super::verifier::verify_square;

/// Recovers batch payloads referenced by Nubit blob pointers.
///
/// Sequencer messages that don't yield a valid pointer (truncated messages, wrong header byte,
/// undecodable pointers) are logged and recovered as an empty payload. This keeps replay over
/// historical batches deterministic. Fetch and verification failures are returned as errors.
#[derive(Debug, Clone)]
pub struct NubitReader {
    reader: Arc<dyn BlobReader>,
}

impl NubitReader {
    pub fn new(reader: Arc<dyn BlobReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl DataAvailabilityReader for NubitReader {
    fn is_valid_header_byte(&self, header: u8) -> bool {
        is_nubit_message_header_byte(header)
    }

    async fn recover_payload_from_batch(
        &self,
        batch_number: u64,
        sequencer_msg: &[u8],
        preimages: Option<&mut dyn PreimageRecorder>,
    ) -> Result<Vec<u8>, RecoveryError> {
        let pointer = match parse_pointer_message(sequencer_msg) {
            Ok(pointer) => pointer,
            Err(err) => {
                tracing::error!(
                    batch_number,
                    %err,
                    "Couldn't deserialize Nubit blob pointer, recovering empty batch"
                );
                return Ok(vec![]);
            }
        };

        let FetchedBlob { payload, square } =
            self.reader.read(&pointer).await.map_err(|source| {
                tracing::error!(
                    batch_number,
                    ?pointer,
                    err = %source,
                    "Failed to resolve blob pointer from Nubit"
                );
                RecoveryError::Fetch { pointer, source }
            })?;

        if payload.is_empty() {
            // The batch was discarded upstream.
            tracing::info!(batch_number, ?pointer, "Nubit blob is empty");
            return Ok(payload);
        }

        let square = square.ok_or(VerificationError::MissingSquareData)?;
        verify_square(&pointer, &square, preimages)?;
        tracing::debug!(
            batch_number,
            ?pointer,
            payload_len = payload.len(),
            "Recovered and verified Nubit blob"
        );
        Ok(payload)
    }

    async fn get_proof(&self, msg: &[u8]) -> Result<Vec<u8>, DAError> {
        self.reader.get_proof(msg).await
    }
}
