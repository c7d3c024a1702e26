use std::sync::Arc;

use async_trait::async_trait;
use nubit_da_client::{types::StoreError, BlobWriter, DataAvailabilityWriter};

/// Name of [`NubitWriter`] reported in logs and metrics.
pub const NUBIT_WRITER_NAME: &str = "Nubit";

/// Stores batch payloads on Nubit DA.
#[derive(Debug, Clone)]
pub struct NubitWriter {
    writer: Arc<dyn BlobWriter>,
}

impl NubitWriter {
    pub fn new(writer: Arc<dyn BlobWriter>) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl DataAvailabilityWriter for NubitWriter {
    async fn store(
        &self,
        payload: Vec<u8>,
        fallback_disabled: bool,
    ) -> Result<Vec<u8>, StoreError> {
        let payload_len = payload.len();
        match self.writer.store(payload).await {
            Ok(commitment) => Ok(commitment),
            Err(err) if fallback_disabled => {
                tracing::error!(
                    payload_len,
                    %err,
                    "Unable to store batch on Nubit and storing data on chain is disabled"
                );
                Err(StoreError::NoFallbackAvailable)
            }
            Err(err) => {
                tracing::warn!(payload_len, %err, "Unable to store batch on Nubit");
                Err(StoreError::Transport(err))
            }
        }
    }

    fn name(&self) -> &'static str {
        NUBIT_WRITER_NAME
    }
}
