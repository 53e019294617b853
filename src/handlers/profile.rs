use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::models::ProfileData;
use crate::server::AppState;
use crate::services::LookupError;

const FETCH_FAILED: &str = "Failed to fetch Twitter data";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Username must not be empty")]
    EmptyUsername,
    #[error("Invalid username")]
    InvalidUsername,
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl ProfileError {
    fn status_and_detail(&self) -> (StatusCode, &'static str) {
        match self {
            ProfileError::EmptyUsername => (StatusCode::BAD_REQUEST, "Username must not be empty"),
            ProfileError::InvalidUsername => (StatusCode::BAD_REQUEST, "Invalid username"),
            ProfileError::Lookup(LookupError::NotFound) => (StatusCode::NOT_FOUND, "User not found"),
            ProfileError::Lookup(LookupError::Upstream { status }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                FETCH_FAILED,
            ),
            ProfileError::Lookup(LookupError::Timeout) => (StatusCode::GATEWAY_TIMEOUT, FETCH_FAILED),
            ProfileError::Lookup(LookupError::Transport(_)) => (StatusCode::BAD_GATEWAY, FETCH_FAILED),
        }
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// `GET /api/twitter/:username`
pub async fn get_twitter_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileData>, ProfileError> {
    if username.trim().is_empty() {
        return Err(ProfileError::EmptyUsername);
    }
    // URL path normalisation would drop `.` and `..` segments
    if username.chars().all(|c| c == '.') {
        return Err(ProfileError::InvalidUsername);
    }

    match state.profile_lookup.lookup(&username).await {
        Ok(profile) => Ok(Json(profile)),
        Err(e) => {
            if let LookupError::Transport(_) | LookupError::Timeout = e {
                log::error!("❌ Profile lookup for {} failed: {}", username, e);
            }
            Err(e.into())
        }
    }
}
