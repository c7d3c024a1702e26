use std::fmt;

use anyhow::Context as _;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use nubit_config::NubitConfig;
use nubit_da_client::{types::DAError, BlobWriter};
use nubit_nmt::Namespace;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::utils::{to_non_retriable_da_error, to_retriable_da_error};

/// Gas price passed with submissions; negative values let the DA node pick the price.
const AUTO_GAS_PRICE: f64 = -1.0;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Transport talking to the Nuport JSON-RPC service of Nubit DA.
#[derive(Clone)]
pub struct NuportClient {
    url: Url,
    namespace: Namespace,
    client: reqwest::Client,
}

impl fmt::Debug for NuportClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NuportClient")
            .field("url", &self.url.as_str())
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl NuportClient {
    pub fn new(config: &NubitConfig) -> anyhow::Result<Self> {
        let url = Url::parse(&config.url)
            .with_context(|| format!("invalid Nuport URL `{}`", config.url))?;
        let namespace = Namespace::from_name(&config.namespace)
            .with_context(|| format!("invalid Nubit namespace `{}`", config.namespace))?;

        let mut headers = HeaderMap::new();
        let auth_key = config.auth_key.expose_secret();
        if !auth_key.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {auth_key}"))
                .context("auth key is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        tracing::info!(%namespace, %url, "Initialized Nuport client");
        Ok(Self {
            url,
            namespace,
            client,
        })
    }

    async fn submit(&self, payload: &[u8]) -> Result<Vec<Vec<u8>>, DAError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": "da.Submit",
            "params": [
                [BASE64.encode(payload)],
                AUTO_GAS_PRICE,
                BASE64.encode(self.namespace.as_bytes()),
            ],
            "id": 1
        });
        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .context("failed to send da.Submit request")
            .map_err(to_retriable_da_error)?;

        let status = response.status();
        if !status.is_success() {
            let err = anyhow::anyhow!("Nuport responded with HTTP status {status}");
            return Err(if status.is_server_error() {
                to_retriable_da_error(err)
            } else {
                to_non_retriable_da_error(err)
            });
        }

        // Timeouts may also elapse while the body is being read.
        let body = response
            .bytes()
            .await
            .context("failed to read da.Submit response")
            .map_err(to_retriable_da_error)?;
        let response: RpcResponse<Vec<String>> = serde_json::from_slice(&body)
            .context("failed to parse da.Submit response")
            .map_err(to_non_retriable_da_error)?;
        if let Some(RpcError { code, message }) = response.error {
            return Err(to_non_retriable_da_error(anyhow::anyhow!(
                "da.Submit failed with code {code}: {message}"
            )));
        }

        response
            .result
            .unwrap_or_default()
            .iter()
            .map(|id| BASE64.decode(id))
            .collect::<Result<_, _>>()
            .context("blob ID is not valid base64")
            .map_err(to_non_retriable_da_error)
    }
}

#[async_trait]
impl BlobWriter for NuportClient {
    async fn store(&self, payload: Vec<u8>) -> Result<Vec<u8>, DAError> {
        tracing::trace!(payload_len = payload.len(), "Submitting batch to Nubit DA");
        let mut ids = self.submit(&payload).await?;
        if ids.len() != 1 {
            let err = anyhow::anyhow!("expected exactly 1 blob ID, got {}", ids.len());
            tracing::error!(%err, "Submitting batch to Nubit DA failed");
            return Err(to_non_retriable_da_error(err));
        }
        let commitment = ids.remove(0);
        tracing::info!(
            commitment = hex::encode(&commitment),
            "Submitted batch to Nubit DA"
        );
        Ok(commitment)
    }
}
