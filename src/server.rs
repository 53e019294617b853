use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::handlers::{menu, profile};
use crate::services::{MenuExtractor, ProfileLookup};

pub struct AppState {
    pub menu_extractor: Arc<dyn MenuExtractor>,
    pub profile_lookup: Arc<dyn ProfileLookup>,
    pub menu_timeout: Duration,
    pub max_upload_bytes: usize,
}

/// Any origin, method and header, with credentials.
///
/// Wildcards are not allowed together with credentials, so the request's own values are echoed.
fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    let state = Arc::new(state);

    Router::new()
        .route("/get-menu/", post(menu::get_menu).layer(upload_limit.clone()))
        .route("/get-menu", post(menu::get_menu).layer(upload_limit))
        .route("/api/twitter/:username", get(profile::get_twitter_profile))
        .route("/health", get(health_check))
        .layer(permissive_cors())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::ProfileData;
    use crate::services::{LookupError, PreparedImage};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// Menu extractor that answers after a fixed delay.
    pub struct StubExtractor {
        pub delay: Duration,
        pub result: Result<String, String>,
    }

    #[async_trait::async_trait]
    impl MenuExtractor for StubExtractor {
        async fn extract_menu(&self, _image: &PreparedImage) -> anyhow::Result<String> {
            tokio::time::sleep(self.delay).await;
            self.result.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    /// Profile backend returning a canned outcome.
    pub struct StubLookup {
        pub outcome: fn(&str) -> Result<ProfileData, LookupError>,
    }

    #[async_trait::async_trait]
    impl ProfileLookup for StubLookup {
        async fn lookup(&self, username: &str) -> Result<ProfileData, LookupError> {
            (self.outcome)(username)
        }
    }

    pub fn test_state(extractor: StubExtractor, lookup: StubLookup) -> AppState {
        AppState {
            menu_extractor: Arc::new(extractor),
            profile_lookup: Arc::new(lookup),
            menu_timeout: Duration::from_millis(100),
            max_upload_bytes: 1024 * 1024,
        }
    }

    pub fn default_state() -> AppState {
        test_state(
            StubExtractor {
                delay: Duration::ZERO,
                result: Ok("[]".to_string()),
            },
            StubLookup {
                outcome: |_| Err(LookupError::NotFound),
            },
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(default_state());

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_with_credentials() {
        let app = create_router(default_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/twitter/jack")
                    .header("origin", "https://menu.example.com")
                    .header("access-control-request-method", "GET")
                    .header("access-control-request-headers", "x-custom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "https://menu.example.com"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-methods"], "GET");
        assert_eq!(headers["access-control-allow-headers"], "x-custom");
    }
}
