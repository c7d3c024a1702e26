//! Configuration of the Nubit DA integration, loaded from `NUBIT_*` environment variables.

use std::time::Duration;

use anyhow::Context as _;
use secrecy::SecretString;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

/// Prefix of environment variables holding [`NubitConfig`].
pub const NUBIT_ENV_PREFIX: &str = "NUBIT_";

/// Configuration of the Nubit DA integration.
#[derive(Debug, Deserialize)]
pub struct NubitConfig {
    /// Whether batches are submitted to Nubit DA.
    #[serde(default)]
    pub enable: bool,
    /// Address of the Nuport RPC service.
    #[serde(default = "NubitConfig::default_url")]
    pub url: String,
    /// Namespace identifying this integration on Nubit DA.
    #[serde(default = "NubitConfig::default_namespace")]
    pub namespace: String,
    /// Auth key for the Nuport RPC service. Empty if the service doesn't require auth.
    #[serde(
        default = "NubitConfig::default_auth_key",
        deserialize_with = "deserialize_secret"
    )]
    pub auth_key: SecretString,
    /// Timeout for a single RPC request, in milliseconds.
    #[serde(default = "NubitConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for NubitConfig {
    fn default() -> Self {
        Self {
            enable: false,
            url: Self::default_url(),
            namespace: Self::default_namespace(),
            auth_key: Self::default_auth_key(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

impl NubitConfig {
    fn default_url() -> String {
        "http://localhost:26656".to_owned()
    }

    fn default_namespace() -> String {
        "nitro-dev".to_owned()
    }

    fn default_auth_key() -> SecretString {
        SecretString::from(String::new())
    }

    const fn default_timeout_ms() -> u64 {
        30_000
    }

    /// Loads the config from `NUBIT_*` environment variables. Missing variables take default values.
    pub fn from_env() -> anyhow::Result<Self> {
        envy_load("nubit", NUBIT_ENV_PREFIX)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Convenience function that loads the structure from the environment variables given the prefix.
pub fn envy_load<T: DeserializeOwned>(name: &str, prefix: &str) -> anyhow::Result<T> {
    envy_load_from(name, prefix, std::env::vars())
}

fn envy_load_from<T, I>(name: &str, prefix: &str, vars: I) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (String, String)>,
{
    envy::prefixed(prefix)
        .from_iter(vars)
        .with_context(|| format!("Cannot load config <{name}>"))
}
