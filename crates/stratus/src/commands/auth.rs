use anyhow::{Result, bail};
use colored::Colorize;
use stratus_cloud_ibm::IbmCloudProvider;

pub async fn handle(provider: &IbmCloudProvider) -> Result<()> {
    let status = provider.check_auth().await;

    if status.authenticated {
        let account_id = status.account_id.unwrap_or_else(|| "unknown".to_string());
        println!(
            "{} authenticated (account {})",
            "✓".green(),
            account_id.cyan()
        );
        Ok(())
    } else {
        bail!(
            "not authenticated: {}",
            status.error.unwrap_or_else(|| "unknown error".to_string())
        )
    }
}
