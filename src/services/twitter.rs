use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{ProfileData, TwitterUser};

const USER_FIELDS: &str =
    "created_at,description,location,profile_image_url,public_metrics,verified,entities,url";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Twitter API returned status {status}")]
    Upstream { status: u16 },
    #[error("User not found")]
    NotFound,
    #[error("Twitter API request timed out")]
    Timeout,
    #[error("Twitter API request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// Trait for user-profile backends
#[async_trait::async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn lookup(&self, username: &str) -> Result<ProfileData, LookupError>;
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    #[serde(default)]
    data: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Twitter API v2 client for the users/by/username endpoint
pub struct TwitterClient {
    bearer_token: String,
    base_url: String,
    client: reqwest::Client,
}

impl TwitterClient {
    pub fn new(bearer_token: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            bearer_token,
            base_url,
            client,
        })
    }

    fn user_url(&self, username: &str) -> Result<Url, LookupError> {
        if username.is_empty() || username.chars().all(|c| c == '.') {
            return Err(LookupError::NotFound);
        }
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LookupError::Transport(format!("invalid Twitter API base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Transport("Twitter API base cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["2", "users", "by", "username", username]);
        url.query_pairs_mut().append_pair("user.fields", USER_FIELDS);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ProfileLookup for TwitterClient {
    async fn lookup(&self, username: &str) -> Result<ProfileData, LookupError> {
        let url = self.user_url(username)?;
        log::info!("🐦 Fetching Twitter profile for: {}", username);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            log::warn!("⚠️ Twitter API returned {} for {}", status, username);
            return Err(LookupError::Upstream {
                status: status.as_u16(),
            });
        }

        let envelope: UserEnvelope = response.json().await?;
        let data = match envelope.data {
            Some(data) if !data.is_empty() => data,
            _ => {
                log::info!("🔍 No Twitter user data for: {}", username);
                return Err(LookupError::NotFound);
            }
        };

        let user: TwitterUser = serde_json::from_value(serde_json::Value::Object(data))
            .map_err(|e| LookupError::Transport(format!("unexpected user payload: {}", e)))?;

        Ok(ProfileData::from_upstream(&user))
    }
}
