mod commands;
mod logging;

use clap::{Parser, Subcommand};
use stratus_cloud_ibm::IbmCloudProvider;

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "IBM Cloud account and resource inventory", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the configured API key authenticates
    Auth,
    /// Print the account id that owns the API key
    Account,
    /// Dump every resource instance in the account as JSON
    Resources,
    /// List resource groups
    #[command(name = "resource-groups")]
    ResourceGroups,
    /// List virtual server instances in one VPC region
    Servers {
        /// Region name, e.g. us-south
        #[arg(short, long, env = "STRATUS_REGION")]
        region: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    // Errors surface here and nowhere else; the exit status is the only
    // failure signal callers get.
    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let provider = IbmCloudProvider::from_env()?;

    match cli.command {
        Commands::Auth => commands::auth::handle(&provider).await,
        Commands::Account => commands::account::handle(&provider).await,
        Commands::Resources => commands::resources::handle(&provider).await,
        Commands::ResourceGroups => commands::groups::handle(&provider).await,
        Commands::Servers { region } => commands::servers::handle(&provider, &region).await,
    }
}
