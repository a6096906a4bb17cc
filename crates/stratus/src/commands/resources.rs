use anyhow::Result;
use stratus_cloud_ibm::IbmCloudProvider;

pub async fn handle(provider: &IbmCloudProvider) -> Result<()> {
    let instances = provider.list_all_resource_instances().await?;
    tracing::info!("fetched {} resource instances", instances.len());

    // Full dump to stdout; downstream tooling consumes this as JSON.
    println!("{}", serde_json::to_string_pretty(&instances)?);
    Ok(())
}
