//! Relay Server - Axum HTTP server

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::proxy::handlers::{assets, relay, upload};
use crate::proxy::upstream::client::RemoteClient;
use crate::uploads::ZipStore;

pub const RELAY_PATH: &str = "/proxy/receive_data";
pub const UPLOAD_ZIP_PATH: &str = "/upload_zip";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub remote: Arc<RemoteClient>,
    pub zip_store: Arc<ZipStore>,
}

/// Relay server instance
pub struct RelayServer {
    config: Config,
    state: AppState,
}

impl RelayServer {
    /// Build the server. The zip save directory is created here, before
    /// anything can be uploaded into it.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let remote = Arc::new(RemoteClient::new(&config.relay)?);
        let zip_store = Arc::new(ZipStore::create(&config.uploads.zip_dir)?);

        let state = AppState { remote, zip_store };

        Ok(Self { config, state })
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // The relay route answers its own pre-flight with exact headers,
        // so it is merged in after the CORS layer is applied.
        let relay_routes = Router::new().route(
            RELAY_PATH,
            post(relay::handle_receive_data).options(relay::handle_preflight),
        );

        Router::new()
            // Health check
            .route("/healthz", get(health_check_handler))
            .route("/health", get(health_check_handler))
            
            .route(UPLOAD_ZIP_PATH, post(upload::handle_upload_zip))
            
            // Web GUI
            .route_service("/", assets::index_service(&self.config.assets))
            .fallback_service(assets::asset_service(&self.config.assets))
            
            .layer(cors)
            .merge(relay_routes)
            .layer(DefaultBodyLimit::max(self.config.uploads.max_body_bytes()))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the relay server (blocking)
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.server.bind_address();
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let app = self.router();

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Serving web GUI from {:?}", self.config.assets.root);
        tracing::info!("Saving ZIP uploads to {:?}", self.state.zip_store.dir());

        // Handle graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Relay server stopped");
        Ok(())
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
