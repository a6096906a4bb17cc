//! IBM Cloud credential configuration

use crate::error::{IbmCloudError, Result};

/// Environment variable holding the account API key.
pub const API_KEY_ENV: &str = "IBMCLOUD_API_KEY";

/// IBM Cloud credentials, resolved once at startup and injected into
/// [`crate::IbmCloudProvider`]. The key is immutable for the lifetime of
/// the value.
#[derive(Debug, Clone)]
pub struct IbmCloudConfig {
    api_key: String,
}

impl IbmCloudConfig {
    /// Create a config from an explicit API key. The key must be non-empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(IbmCloudError::InvalidConfig(
                "API key must not be empty".to_string(),
            ));
        }
        Ok(Self { api_key })
    }

    /// Create a config from the `IBMCLOUD_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| IbmCloudError::MissingEnvVar(API_KEY_ENV.to_string()))?;
        Self::new(api_key)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}
