//! IBM Cloud provider façade
//!
//! Entry point tying the credential config to the individual service
//! clients. Every factory builds a fresh authenticator bound to the
//! configured key, so provider values can be created and dropped freely
//! from any call site.

use serde::{Deserialize, Serialize};

use crate::auth::IamAuthenticator;
use crate::config::IbmCloudConfig;
use crate::error::Result;
use crate::iam::IamIdentityClient;
use crate::resource_controller::{ResourceControllerClient, ResourceInstance};
use crate::resource_manager::ResourceManagerClient;
use crate::vpc::VpcClient;

/// IBM Cloud provider.
pub struct IbmCloudProvider {
    config: IbmCloudConfig,
}

/// Authentication check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether the configured key authenticates.
    pub authenticated: bool,

    /// The owning account id, when authenticated.
    pub account_id: Option<String>,

    /// Error message when not authenticated.
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_id: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_id: Some(account_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_id: None,
            error: Some(error.into()),
        }
    }
}

impl IbmCloudProvider {
    pub fn new(config: IbmCloudConfig) -> Self {
        Self { config }
    }

    /// Build a provider from the `IBMCLOUD_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(IbmCloudConfig::from_env()?))
    }

    pub fn config(&self) -> &IbmCloudConfig {
        &self.config
    }

    /// Fresh authenticator bound to the configured API key.
    pub fn authenticator(&self) -> IamAuthenticator {
        IamAuthenticator::new(self.config.api_key())
    }

    pub fn iam_client(&self) -> IamIdentityClient {
        IamIdentityClient::new(self.authenticator())
    }

    pub fn resource_controller_client(&self) -> ResourceControllerClient {
        ResourceControllerClient::new(self.authenticator())
    }

    pub fn resource_manager_client(&self) -> ResourceManagerClient {
        ResourceManagerClient::new(self.authenticator())
    }

    /// VPC client for one region.
    pub fn vpc_client(&self, region: &str) -> Result<VpcClient> {
        VpcClient::new(self.authenticator(), region)
    }

    /// Resolve the account id that owns the configured API key.
    pub async fn account_id(&self) -> Result<String> {
        self.iam_client().account_id().await
    }

    /// Collect every resource instance in the account, in page order.
    pub async fn list_all_resource_instances(&self) -> Result<Vec<ResourceInstance>> {
        self.resource_controller_client()
            .list_resource_instances()
            .await
    }

    /// Check whether the configured key authenticates, without failing.
    pub async fn check_auth(&self) -> AuthStatus {
        match self.account_id().await {
            Ok(account_id) => {
                tracing::debug!("authenticated against account {account_id}");
                AuthStatus::ok(account_id)
            }
            Err(e) => AuthStatus::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> IbmCloudProvider {
        IbmCloudProvider::new(IbmCloudConfig::new("test-key").unwrap())
    }

    #[test]
    fn test_factories_bind_the_configured_key() {
        let provider = provider();
        assert_eq!(provider.authenticator().api_key(), "test-key");
        // Each call hands out its own authenticator.
        assert_eq!(provider.authenticator().api_key(), "test-key");
    }

    #[test]
    fn test_vpc_factory_rejects_empty_region() {
        assert!(provider().vpc_client("").is_err());
        assert!(provider().vpc_client("us-south").is_ok());
    }

    #[test]
    fn test_auth_status_constructors() {
        let ok = AuthStatus::ok("account-1");
        assert!(ok.authenticated);
        assert_eq!(ok.account_id.as_deref(), Some("account-1"));
        assert!(ok.error.is_none());

        let failed = AuthStatus::failed("bad key");
        assert!(!failed.authenticated);
        assert_eq!(failed.error.as_deref(), Some("bad key"));
    }
}
