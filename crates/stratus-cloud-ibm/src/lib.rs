//! IBM Cloud provider client for Stratus
//!
//! Thin, typed clients over the IBM Cloud platform APIs: IAM identity,
//! resource controller, resource manager and regional VPC compute.
//! Authentication uses an account API key, exchanged for a bearer token on
//! first use.
//!
//! # Requirements
//!
//! - `IBMCLOUD_API_KEY` environment variable (or an explicit
//!   [`IbmCloudConfig`]) holding a valid IBM Cloud API key
//!
//! # Example
//!
//! ```ignore
//! use stratus_cloud_ibm::IbmCloudProvider;
//!
//! let provider = IbmCloudProvider::from_env()?;
//!
//! // Which account does this key belong to?
//! let account_id = provider.account_id().await?;
//!
//! // Everything provisioned in the account, across all pages.
//! let instances = provider.list_all_resource_instances().await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod iam;
pub mod pager;
pub mod provider;
pub mod resource_controller;
pub mod resource_manager;
pub mod vpc;

pub use auth::IamAuthenticator;
pub use config::{API_KEY_ENV, IbmCloudConfig};
pub use error::{IbmCloudError, Result};
pub use iam::{ApiKeyDetails, IamIdentityClient};
pub use pager::{Page, PageFetcher, Pager};
pub use provider::{AuthStatus, IbmCloudProvider};
pub use resource_controller::{
    ResourceBinding, ResourceControllerClient, ResourceInstance, ResourceKey,
};
pub use resource_manager::{ResourceGroup, ResourceManagerClient};
pub use vpc::{VpcClient, VpcInstance, ZoneRef};
