//! IAM identity client
//!
//! Covers the single identity operation this crate needs: looking up the
//! details of an API key to learn which account owns it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::IamAuthenticator;
use crate::error::{IbmCloudError, Result};

const IAM_ENDPOINT: &str = "https://iam.cloud.ibm.com";

/// Client for the IAM identity service.
#[derive(Clone)]
pub struct IamIdentityClient {
    client: reqwest::Client,
    authenticator: IamAuthenticator,
    endpoint: String,
}

impl IamIdentityClient {
    pub fn new(authenticator: IamAuthenticator) -> Self {
        Self::with_endpoint(authenticator, IAM_ENDPOINT)
    }

    pub fn with_endpoint(authenticator: IamAuthenticator, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            authenticator,
            endpoint: endpoint.into(),
        }
    }

    /// Look up the details of an API key.
    ///
    /// The key travels in the `IAM-Apikey` header, not the URL.
    pub async fn get_api_key_details(&self, iam_api_key: &str) -> Result<ApiKeyDetails> {
        let token = self.authenticator.access_token().await?;
        let url = format!("{}/v1/apikeys/details", self.endpoint);

        tracing::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("IAM-Apikey", iam_api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IbmCloudError::api(status, &body));
        }

        Ok(response.json().await?)
    }

    /// Resolve the account that owns the authenticator's API key.
    pub async fn account_id(&self) -> Result<String> {
        let api_key = self.authenticator.api_key().to_string();
        let details = self.get_api_key_details(&api_key).await?;
        Ok(details.account_id)
    }
}

/// API key details as returned by `GET /v1/apikeys/details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyDetails {
    pub id: String,
    pub iam_id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
