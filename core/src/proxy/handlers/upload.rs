//! Zip upload handler
//! Handles /upload_zip

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
};

use crate::proxy::error::UploadError;
use crate::proxy::server::AppState;

pub const ZIP_FIELD: &str = "zip";

/// Persist the `zip` file part under the configured save directory
pub async fn handle_upload_zip(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, String), UploadError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(ZIP_FIELD) {
            continue;
        }
        // A `zip` part without a filename is a plain text field, not an upload
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field.bytes().await?;
        let path = state.zip_store.save(&file_name, &bytes).await?;
        return Ok((StatusCode::OK, format!("ZIP file saved to {}", path.display())));
    }

    Err(UploadError::MissingFile)
}
