use std::path::PathBuf;
use std::time::Duration;

use floorplan_relay_core::browser;
use floorplan_relay_core::config::{expand_path, load_config};
use floorplan_relay_core::proxy::RelayServer;

pub async fn run(
    config_path: Option<PathBuf>,
    port_override: Option<u16>,
    root_override: Option<PathBuf>,
    no_browser: bool,
) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(config_path)?;
    
    // Apply overrides if provided
    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(root) = root_override {
        config.assets.root = root;
    }
    if no_browser {
        config.browser.open = false;
    }
    
    config.assets.root = expand_path(&config.assets.root);
    config.uploads.zip_dir = expand_path(&config.uploads.zip_dir);
    
    let url = config.server.public_url();
    
    println!();
    println!("{}", "=".repeat(60));
    println!("Floorplan Visualizer - Launcher");
    println!("{}", "=".repeat(60));
    println!();
    println!("Starting server at: {}", url);
    if config.browser.open {
        println!("Browser will open in {} seconds...", config.browser.delay_seconds);
    }
    println!("Press Ctrl+C to stop the server.");
    println!();
    println!("{}", "=".repeat(60));
    println!();
    
    tracing::info!("  Bind address: {}", config.server.bind_address());
    tracing::info!("  Web GUI root: {:?}", config.assets.root);
    tracing::info!("  ZIP save directory: {:?}", config.uploads.zip_dir);
    tracing::info!("  Relay timeout: {}s", config.relay.request_timeout);
    
    let open_browser = config.browser.open;
    let browser_delay = Duration::from_secs(config.browser.delay_seconds);
    
    let server = RelayServer::new(config)?;
    
    if open_browser {
        browser::spawn_delayed_open(url, browser_delay);
    }
    
    // Run server (blocks until shutdown)
    server.run().await?;
    
    Ok(())
}
