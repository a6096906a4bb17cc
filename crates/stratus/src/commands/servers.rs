use anyhow::Result;
use colored::Colorize;
use stratus_cloud_ibm::IbmCloudProvider;

pub async fn handle(provider: &IbmCloudProvider, region: &str) -> Result<()> {
    let client = provider.vpc_client(region)?;
    let instances = client.list_instances().await?;

    if instances.is_empty() {
        println!("{}", format!("no instances in {region}").dimmed());
        return Ok(());
    }

    for instance in &instances {
        let status = instance.status.as_deref().unwrap_or("-");
        let zone = instance
            .zone
            .as_ref()
            .map(|zone| zone.name.as_str())
            .unwrap_or("-");
        println!(
            "{}  {}  {}  {}",
            instance.id.cyan(),
            instance.name,
            status,
            zone.dimmed()
        );
    }
    Ok(())
}
