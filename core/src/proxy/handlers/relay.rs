//! Relay handler
//! Handles /proxy/receive_data

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::proxy::error::RelayError;
use crate::proxy::form::RelayForm;
use crate::proxy::server::AppState;

/// CORS pre-flight for the relay endpoint
pub async fn handle_preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

/// Forward the uploaded form to `http://<remote_ip>:<remote_port>/receive_data`
/// and hand back the remote's reply as-is
pub async fn handle_receive_data(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, RelayError> {
    tracing::info!("Relay: forwarding request to remote server...");

    let form = RelayForm::from_multipart(multipart?).await?;
    let url = state
        .remote
        .target_url(form.remote_ip.as_deref(), form.remote_port.as_deref())?;
    tracing::info!("Using remote URL: {}", url);

    let reply = state.remote.forward(url, form.into_outbound()?).await?;
    Ok(reply.into_response())
}
