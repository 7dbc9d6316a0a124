use std::path::PathBuf;

use floorplan_relay_core::config::{expand_path, load_config_with_source};

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, config_file) = load_config_with_source(config_path)?;
    
    println!("Floorplan Relay Status");
    println!("======================");
    println!();
    println!("Configuration:");
    match &config_file {
        Some(path) => println!("  Config file: {:?}", path),
        None => println!("  Config file: none (built-in defaults)"),
    }
    println!("  Web GUI root: {:?}", expand_path(&config.assets.root));
    println!("  Entry page: {}", config.assets.index);
    println!("  ZIP save dir: {:?}", expand_path(&config.uploads.zip_dir));
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Relay timeout: {}s", config.relay.request_timeout);
    println!("  Open browser: {}", config.browser.open);
    
    // Check if server is reachable
    println!();
    let url = format!("{}/healthz", config.server.public_url());
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }
    
    Ok(())
}
