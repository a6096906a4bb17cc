//! VPC compute client
//!
//! The VPC service is regional: the base URL embeds the region name and
//! every request carries the API `version` date plus `generation=2`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::IamAuthenticator;
use crate::error::{IbmCloudError, Result};
use crate::pager::{Page, PageFetcher, Pager, start_token};

/// API version date sent with every request; required by the service.
const VPC_API_VERSION: &str = "2025-06-24";
const VPC_GENERATION: u32 = 2;
const PAGE_LIMIT: u32 = 100;

/// Client for the VPC compute service in one region.
#[derive(Clone, Debug)]
pub struct VpcClient {
    client: reqwest::Client,
    authenticator: IamAuthenticator,
    endpoint: String,
}

impl VpcClient {
    /// Build a client for `region`.
    ///
    /// The region must be non-empty; beyond that it is not checked against
    /// the region catalog, so a bad name only surfaces when a request fails.
    pub fn new(authenticator: IamAuthenticator, region: &str) -> Result<Self> {
        if region.trim().is_empty() {
            return Err(IbmCloudError::InvalidConfig(
                "VPC region must not be empty".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            authenticator,
            endpoint: format!("https://{region}.iaas.cloud.ibm.com/v1"),
        })
    }

    /// The region-specific base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Pager over all virtual server instances in the region.
    pub fn instances_pager(&self) -> Pager<InstancesFetcher> {
        Pager::new(InstancesFetcher {
            client: self.clone(),
        })
    }

    /// Collect all virtual server instances in the region, in page order.
    pub async fn list_instances(&self) -> Result<Vec<VpcInstance>> {
        self.instances_pager().get_all().await
    }

    async fn fetch_instances_page(&self, start: Option<&str>) -> Result<Page<VpcInstance>> {
        let token = self.authenticator.access_token().await?;
        let url = format!("{}/instances", self.endpoint);

        tracing::debug!("GET {url} (start={start:?})");
        let mut request = self.client.get(&url).bearer_auth(token).query(&[
            ("version", VPC_API_VERSION.to_string()),
            ("generation", VPC_GENERATION.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ]);
        if let Some(start) = start {
            request = request.query(&[("start", start)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IbmCloudError::api(status, &body));
        }

        let collection: InstanceCollection = response.json().await?;
        let Some(instances) = collection.instances else {
            return Err(IbmCloudError::ProtocolViolation(
                "instance page is missing its instances array".to_string(),
            ));
        };
        Ok(Page {
            items: instances,
            next: collection.next.and_then(|link| start_token(&link.href)),
        })
    }
}

/// Fetcher for the regional instance listing.
pub struct InstancesFetcher {
    client: VpcClient,
}

#[async_trait]
impl PageFetcher for InstancesFetcher {
    type Item = VpcInstance;

    async fn fetch_page(&self, start: Option<&str>) -> Result<Page<VpcInstance>> {
        self.client.fetch_instances_page(start).await
    }
}

#[derive(Debug, Deserialize)]
struct InstanceCollection {
    instances: Option<Vec<VpcInstance>>,
    #[serde(default)]
    next: Option<PageLink>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    href: String,
}

/// A virtual server instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpcInstance {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<ZoneRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to the zone an instance lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRef {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_template() {
        let client = VpcClient::new(IamAuthenticator::new("key"), "us-south").unwrap();
        assert_eq!(client.endpoint(), "https://us-south.iaas.cloud.ibm.com/v1");

        let client = VpcClient::new(IamAuthenticator::new("key"), "eu-de").unwrap();
        assert_eq!(client.endpoint(), "https://eu-de.iaas.cloud.ibm.com/v1");
    }

    #[test]
    fn test_empty_region_rejected() {
        let err = VpcClient::new(IamAuthenticator::new("key"), "").unwrap_err();
        assert!(matches!(err, IbmCloudError::InvalidConfig(_)));

        let err = VpcClient::new(IamAuthenticator::new("key"), "  ").unwrap_err();
        assert!(matches!(err, IbmCloudError::InvalidConfig(_)));
    }

    #[test]
    fn test_instance_collection_deserialization() {
        let body = r#"{
            "limit": 100,
            "total_count": 1,
            "next": {"href": "https://us-south.iaas.cloud.ibm.com/v1/instances?start=9d5a91a3"},
            "instances": [
                {
                    "id": "0717-9b92a7b3-1111-2222-3333-ffe31ec27fc2",
                    "name": "worker-0",
                    "status": "running",
                    "zone": {"name": "us-south-1"},
                    "created_at": "2026-01-12T08:15:00Z",
                    "profile": {"name": "bx2-2x8"}
                }
            ]
        }"#;

        let collection: InstanceCollection = serde_json::from_str(body).unwrap();
        let instances = collection.instances.unwrap();
        assert_eq!(instances[0].name, "worker-0");
        assert_eq!(instances[0].status.as_deref(), Some("running"));
        assert_eq!(instances[0].zone.as_ref().unwrap().name, "us-south-1");
        assert_eq!(
            collection.next.unwrap().href,
            "https://us-south.iaas.cloud.ibm.com/v1/instances?start=9d5a91a3"
        );
    }
}
