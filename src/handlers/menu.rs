use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::server::AppState;
use crate::services::{prepare_image, ImageError};

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("{0}")]
    InvalidUpload(String),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Request timed out. Try again.")]
    Timeout,
    #[error("{0}")]
    Upstream(String),
}

impl IntoResponse for MenuError {
    fn into_response(self) -> Response {
        let status = match &self {
            MenuError::InvalidUpload(_) | MenuError::Image(ImageError::Empty | ImageError::Decode(_)) => {
                StatusCode::BAD_REQUEST
            }
            MenuError::Multipart(err) => err.status(),
            MenuError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            MenuError::Image(ImageError::Encode(_)) | MenuError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    /// Model output passed through as JSON text, not re-parsed.
    pub menu: String,
}

/// `POST /get-menu/`
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MenuResponse>, MenuError> {
    let multipart = multipart.map_err(|e| MenuError::InvalidUpload(e.body_text()))?;
    let upload = read_image_field(multipart).await?;
    log::info!("📸 Menu upload received: {} bytes", upload.len());

    let image = tokio::task::spawn_blocking(move || prepare_image(&upload))
        .await
        .map_err(|e| MenuError::Upstream(format!("Image processing failed: {}", e)))??;

    match tokio::time::timeout(state.menu_timeout, state.menu_extractor.extract_menu(&image)).await
    {
        Ok(Ok(menu)) => Ok(Json(MenuResponse { menu })),
        Ok(Err(e)) => {
            log::error!("❌ Menu extraction failed: {}", e);
            Err(MenuError::Upstream(e.to_string()))
        }
        Err(_) => {
            log::warn!("⏰ Menu extraction exceeded {:?}", state.menu_timeout);
            Err(MenuError::Timeout)
        }
    }
}

/// Pick the `image` field, or failing that the first field that carries a file name.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, MenuError> {
    let mut fallback = None;

    while let Some(field) = multipart.next_field().await? {
        let is_image_field = field.name() == Some(IMAGE_FIELD);
        let is_file = field.file_name().is_some();

        if is_image_field {
            return Ok(field.bytes().await?.to_vec());
        }
        if is_file && fallback.is_none() {
            fallback = Some(field.bytes().await?.to_vec());
        }
    }

    fallback.ok_or_else(|| {
        MenuError::InvalidUpload(format!("Missing `{}` file in multipart form", IMAGE_FIELD))
    })
}
