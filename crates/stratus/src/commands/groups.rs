use anyhow::Result;
use colored::Colorize;
use stratus_cloud_ibm::IbmCloudProvider;

pub async fn handle(provider: &IbmCloudProvider) -> Result<()> {
    let groups = provider
        .resource_manager_client()
        .list_resource_groups()
        .await?;

    for group in &groups {
        let marker = if group.default { " (default)" } else { "" };
        println!("{}  {}{}", group.id.cyan(), group.name, marker.dimmed());
    }
    Ok(())
}
