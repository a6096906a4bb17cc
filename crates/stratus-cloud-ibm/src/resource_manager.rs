//! Resource manager client

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::IamAuthenticator;
use crate::error::{IbmCloudError, Result};

const RESOURCE_MANAGER_ENDPOINT: &str = "https://resource-manager.cloud.ibm.com";

/// Client for the resource manager service.
#[derive(Clone)]
pub struct ResourceManagerClient {
    client: reqwest::Client,
    authenticator: IamAuthenticator,
    endpoint: String,
}

impl ResourceManagerClient {
    pub fn new(authenticator: IamAuthenticator) -> Self {
        Self::with_endpoint(authenticator, RESOURCE_MANAGER_ENDPOINT)
    }

    pub fn with_endpoint(authenticator: IamAuthenticator, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            authenticator,
            endpoint: endpoint.into(),
        }
    }

    /// List every resource group visible to the account.
    pub async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>> {
        let token = self.authenticator.access_token().await?;
        let url = format!("{}/v2/resource_groups", self.endpoint);

        tracing::debug!("GET {url}");
        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IbmCloudError::api(status, &body));
        }

        let list: ResourceGroupList = response.json().await?;
        Ok(list.resources)
    }
}

#[derive(Debug, Deserialize)]
struct ResourceGroupList {
    resources: Vec<ResourceGroup>,
}

/// A resource group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
