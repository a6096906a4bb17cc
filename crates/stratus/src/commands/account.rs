use anyhow::Result;
use stratus_cloud_ibm::IbmCloudProvider;

pub async fn handle(provider: &IbmCloudProvider) -> Result<()> {
    let account_id = provider.account_id().await?;
    println!("{account_id}");
    Ok(())
}
