pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "floorplan-relay")]
#[command(author, version, about = "Floorplan Visualizer launcher - serves the web GUI and relays uploads to a remote server")]
pub struct Cli {
    /// Path to config file (checked in order: local relay.toml, ~/.config/floorplan-relay/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `start` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server and open the web GUI
    Start {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        
        /// Directory to serve the web GUI from (overrides config)
        #[arg(short, long)]
        root: Option<PathBuf>,
        
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    
    /// Show launcher status
    Status,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Start {
            port: None,
            root: None,
            no_browser: false,
        }
    }
}
