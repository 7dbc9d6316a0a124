use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Launcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    
    #[serde(default)]
    pub assets: AssetsConfig,
    
    #[serde(default)]
    pub uploads: UploadsConfig,
    
    #[serde(default)]
    pub relay: RelayConfig,
    
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    
    #[serde(default = "default_host")]
    pub host: String,
    
    /// Host used when pointing a browser (or the status probe) at the server
    #[serde(default = "default_public_host")]
    pub public_host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            public_host: default_public_host(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
    
    pub fn public_url(&self) -> String {
        format!("http://{}:{}", self.public_host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory the web GUI is served from
    #[serde(default = "default_assets_root")]
    pub root: PathBuf,
    
    /// Entry document returned for `/`
    #[serde(default = "default_index")]
    pub index: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
            index: default_index(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_zip_dir")]
    pub zip_dir: PathBuf,
    
    #[serde(default = "default_max_body_mb")]
    pub max_body_mb: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            zip_dir: default_zip_dir(),
            max_body_mb: default_max_body_mb(),
        }
    }
}

impl UploadsConfig {
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Upper bound on waiting for the remote reply, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    
    /// Path appended to `http://<remote_ip>:<remote_port>`
    #[serde(default = "default_remote_path")]
    pub remote_path: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            remote_path: default_remote_path(),
        }
    }
}

impl RelayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
    
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_open_browser")]
    pub open: bool,
    
    #[serde(default = "default_browser_delay")]
    pub delay_seconds: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            open: default_open_browser(),
            delay_seconds: default_browser_delay(),
        }
    }
}

// Default value functions
fn default_port() -> u16 { 5000 }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_public_host() -> String { "localhost".to_string() }
fn default_assets_root() -> PathBuf { PathBuf::from(".") }
fn default_index() -> String { "index.html".to_string() }
fn default_zip_dir() -> PathBuf { PathBuf::from("zip_file") }
fn default_max_body_mb() -> usize { 100 }
fn default_request_timeout() -> u64 { 120 }
fn default_connect_timeout() -> u64 { 20 }
fn default_remote_path() -> String { "/receive_data".to_string() }
fn default_open_browser() -> bool { true }
fn default_browser_delay() -> u64 { 3 }

/// Get default config file path
/// Uses ~/.config/floorplan-relay/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("floorplan-relay")
        .join("config.toml")
}

/// Load config from file, or return defaults if not found.
/// 
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./relay.toml (if exists)
/// 3. default_config_path() (usually ~/.config/floorplan-relay/config.toml)
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    load_config_with_source(path).map(|(config, _)| config)
}

/// Same as [`load_config`], also returning the file that was read
/// (`None` when the built-in defaults are used).
pub fn load_config_with_source(path: Option<PathBuf>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    if let Some(config_path) = path {
        if config_path.exists() {
            let config = read_config(&config_path)?;
            tracing::info!("Loaded config from specified path {:?}", config_path);
            return Ok((config, Some(config_path)));
        } else {
            anyhow::bail!("Specified config file not found: {:?}", config_path);
        }
    }

    let local_config = PathBuf::from("relay.toml");
    if local_config.exists() {
        match read_config(&local_config) {
            Ok(config) => {
                tracing::info!("Loaded config from current directory {:?}", local_config);
                return Ok((config, Some(local_config)));
            }
            Err(e) => {
                tracing::error!("Failed to load ./relay.toml: {}. Falling back to default path.", e);
            }
        }
    }

    let default_path = default_config_path();
    if default_path.exists() {
        let config = read_config(&default_path)?;
        tracing::info!("Loaded config from default path {:?}", default_path);
        Ok((config, Some(default_path)))
    } else {
        tracing::info!("No config file found, using defaults");
        Ok((Config::default(), None))
    }
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Expand ~ in path to home directory
pub fn expand_path(path: &PathBuf) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_launcher_constants() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.server.public_url(), "http://localhost:5000");
        assert_eq!(config.assets.index, "index.html");
        assert_eq!(config.uploads.zip_dir, PathBuf::from("zip_file"));
        assert_eq!(config.relay.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.relay.remote_path, "/receive_data");
        assert!(config.browser.open);
        assert_eq!(config.browser.delay_seconds, 3);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [relay]
            request_timeout = 5

            [browser]
            open = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.relay.request_timeout, 5);
        assert_eq!(config.relay.connect_timeout, 20);
        assert!(!config.browser.open);
        assert_eq!(config.uploads.max_body_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        std::fs::write(&path, "[uploads]\nzip_dir = \"archives\"\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.uploads.zip_dir, PathBuf::from("archives"));
    }

    #[test]
    fn explicit_config_reports_its_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[server]\nport = 5050\n").unwrap();

        let (config, source) = load_config_with_source(Some(path.clone())).unwrap();
        assert_eq!(config.server.port, 5050);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn expand_path_leaves_relative_paths_alone() {
        let path = PathBuf::from("zip_file");
        assert_eq!(expand_path(&path), path);
    }
}
