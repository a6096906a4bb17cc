//! IAM authenticator
//!
//! Exchanges an account API key for a bearer access token against the IAM
//! token service. The exchange is deferred until the first request; the
//! token is then reused until shortly before its reported expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{IbmCloudError, Result, error_message};

const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Tokens are considered stale this long before the server-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Attaches credentials to outgoing requests.
///
/// Cloning is cheap; clones share the underlying token cache.
#[derive(Clone, Debug)]
pub struct IamAuthenticator {
    client: reqwest::Client,
    api_key: String,
    token_url: String,
    cache: Arc<Mutex<Option<CachedToken>>>,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl IamAuthenticator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_token_url(api_key, IAM_TOKEN_URL)
    }

    /// Authenticator pointed at a non-default token endpoint.
    pub fn with_token_url(api_key: impl Into<String>, token_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            token_url: token_url.into(),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// The API key this authenticator is bound to.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Return a valid bearer token, performing the API key grant if the
    /// cached token is missing or stale.
    pub async fn access_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }

        tracing::debug!("requesting IAM access token");
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", APIKEY_GRANT_TYPE),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IbmCloudError::AuthenticationFailed(error_message(&body)));
        }

        let token: TokenResponse = response.json().await?;
        let expires_at =
            Instant::now() + Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cache = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }
}
