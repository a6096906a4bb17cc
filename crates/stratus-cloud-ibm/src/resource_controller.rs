//! Resource controller client
//!
//! Paginated listings of everything the resource controller tracks for an
//! account: provisioned resource instances, plus their bindings and keys.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::IamAuthenticator;
use crate::error::{IbmCloudError, Result};
use crate::pager::{Page, PageFetcher, Pager, start_token};

const RESOURCE_CONTROLLER_ENDPOINT: &str = "https://resource-controller.cloud.ibm.com";
const PAGE_LIMIT: u32 = 100;

/// Client for the resource controller service.
#[derive(Clone)]
pub struct ResourceControllerClient {
    client: reqwest::Client,
    authenticator: IamAuthenticator,
    endpoint: String,
}

impl ResourceControllerClient {
    pub fn new(authenticator: IamAuthenticator) -> Self {
        Self::with_endpoint(authenticator, RESOURCE_CONTROLLER_ENDPOINT)
    }

    pub fn with_endpoint(authenticator: IamAuthenticator, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            authenticator,
            endpoint: endpoint.into(),
        }
    }

    /// Pager over every resource instance in the account.
    pub fn resource_instances_pager(&self) -> Pager<ListFetcher<ResourceInstance>> {
        self.pager("/v2/resource_instances")
    }

    /// Pager over every resource binding in the account.
    pub fn resource_bindings_pager(&self) -> Pager<ListFetcher<ResourceBinding>> {
        self.pager("/v2/resource_bindings")
    }

    /// Pager over every resource key in the account.
    pub fn resource_keys_pager(&self) -> Pager<ListFetcher<ResourceKey>> {
        self.pager("/v2/resource_keys")
    }

    /// Collect all resource instances, in service page order.
    pub async fn list_resource_instances(&self) -> Result<Vec<ResourceInstance>> {
        self.resource_instances_pager().get_all().await
    }

    /// Collect all resource bindings, in service page order.
    pub async fn list_resource_bindings(&self) -> Result<Vec<ResourceBinding>> {
        self.resource_bindings_pager().get_all().await
    }

    /// Collect all resource keys, in service page order.
    pub async fn list_resource_keys(&self) -> Result<Vec<ResourceKey>> {
        self.resource_keys_pager().get_all().await
    }

    fn pager<T: DeserializeOwned + Send + Sync>(&self, path: &'static str) -> Pager<ListFetcher<T>> {
        Pager::new(ListFetcher {
            client: self.clone(),
            path,
            _item: PhantomData,
        })
    }

    async fn fetch_list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        start: Option<&str>,
    ) -> Result<Page<T>> {
        let token = self.authenticator.access_token().await?;
        let url = format!("{}{}", self.endpoint, path);

        tracing::debug!("GET {url} (start={start:?})");
        let mut request = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("limit", PAGE_LIMIT)]);
        if let Some(start) = start {
            request = request.query(&[("start", start)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IbmCloudError::api(status, &body));
        }

        let list: ResourceList<T> = response.json().await?;
        page_from_list(path, list)
    }
}

/// Fetcher bound to one resource-controller list endpoint.
pub struct ListFetcher<T> {
    client: ResourceControllerClient,
    path: &'static str,
    _item: PhantomData<T>,
}

#[async_trait]
impl<T: DeserializeOwned + Send + Sync> PageFetcher for ListFetcher<T> {
    type Item = T;

    async fn fetch_page(&self, start: Option<&str>) -> Result<Page<T>> {
        self.client.fetch_list_page(self.path, start).await
    }
}

#[derive(Debug, Deserialize)]
struct ResourceList<T> {
    #[serde(default)]
    next_url: Option<String>,
    resources: Option<Vec<T>>,
}

/// Convert a wire page into a [`Page`], enforcing that a page actually
/// carries its `resources` array.
fn page_from_list<T>(path: &str, list: ResourceList<T>) -> Result<Page<T>> {
    let Some(items) = list.resources else {
        return Err(IbmCloudError::ProtocolViolation(format!(
            "page from {path} is missing its resources array"
        )));
    };
    Ok(Page {
        items,
        next: list.next_url.as_deref().and_then(start_token),
    })
}

/// A provisioned resource, as returned by the resource controller.
///
/// Fields the inventory commands rely on are typed; everything else the
/// service returns is preserved in `extra`, so a JSON dump round-trips the
/// full record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInstance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A binding between a resource instance and an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceBinding {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_crn: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A credential key created against a resource instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceKey {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page_body() -> &'static str {
        r#"{
            "rows_count": 2,
            "next_url": "/v2/resource_instances?limit=100&start=Nzg5MDEyMzQ1",
            "resources": [
                {
                    "id": "crn:v1:bluemix:public:cloud-object-storage:global:a/8d63fb1c:inst-1::",
                    "guid": "aa1b2c3d-1111-2222-3333-444455556666",
                    "name": "inventory-cos",
                    "state": "active",
                    "region_id": "global",
                    "resource_group_id": "0be5ad401ae913d8ff665d92680664ed",
                    "resource_plan_id": "744bfc56-d12c-4866-88d5-dac9139e0e5d"
                },
                {
                    "id": "crn:v1:bluemix:public:kms:us-south:a/8d63fb1c:inst-2::",
                    "guid": "bb1b2c3d-1111-2222-3333-444455556666",
                    "name": "inventory-kms",
                    "state": "active",
                    "region_id": "us-south"
                }
            ]
        }"#
    }

    #[test]
    fn test_page_from_list_extracts_items_and_start() {
        let list: ResourceList<ResourceInstance> =
            serde_json::from_str(sample_page_body()).unwrap();
        let page = page_from_list("/v2/resource_instances", list).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name.as_deref(), Some("inventory-cos"));
        assert_eq!(page.next.as_deref(), Some("Nzg5MDEyMzQ1"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let body = r#"{"rows_count": 0, "resources": []}"#;
        let list: ResourceList<ResourceInstance> = serde_json::from_str(body).unwrap();
        let page = page_from_list("/v2/resource_instances", list).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_missing_resources_array_is_a_protocol_violation() {
        let body = r#"{"rows_count": 2, "next_url": "/v2/resource_instances?start=abc"}"#;
        let list: ResourceList<ResourceInstance> = serde_json::from_str(body).unwrap();
        let err = page_from_list("/v2/resource_instances", list).unwrap_err();
        assert!(matches!(err, IbmCloudError::ProtocolViolation(_)));
    }

    #[test]
    fn test_resource_instance_dump_round_trips_unknown_fields() {
        let list: ResourceList<ResourceInstance> =
            serde_json::from_str(sample_page_body()).unwrap();
        let resources = list.resources.unwrap();

        let dumped = serde_json::to_value(&resources[0]).unwrap();
        assert_eq!(
            dumped["resource_plan_id"],
            "744bfc56-d12c-4866-88d5-dac9139e0e5d"
        );
        assert_eq!(dumped["state"], "active");
    }
}
