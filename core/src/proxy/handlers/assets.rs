//! Static asset serving for the web GUI

use tower_http::services::{ServeDir, ServeFile};

use crate::config::AssetsConfig;

/// Entry document served at `/`
pub fn index_service(config: &AssetsConfig) -> ServeFile {
    ServeFile::new(config.root.join(&config.index))
}

/// Everything else under the asset root. `ServeDir` refuses `..` segments,
/// so lookups stay inside the root while nested paths keep working.
pub fn asset_service(config: &AssetsConfig) -> ServeDir {
    ServeDir::new(&config.root)
}
