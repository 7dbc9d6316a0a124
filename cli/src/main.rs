use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("floorplan_relay=info".parse()?)
                .add_directive("floorplan_relay_core=info".parse()?)
                .add_directive("tower_http=info".parse()?)
        )
        .init();
    
    let cli = Cli::parse();
    
    match cli.command.unwrap_or_default() {
        Commands::Start { port, root, no_browser } => {
            cli::commands::start::run(cli.config, port, root, no_browser).await?;
        }
        Commands::Status => {
            cli::commands::status::run(cli.config).await?;
        }
    }
    
    Ok(())
}
