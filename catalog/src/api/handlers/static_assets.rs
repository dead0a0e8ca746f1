//! HTTP handler for embedded static assets.

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::static_assets;

/// Serve a file from the embedded `static/` directory
#[instrument]
pub async fn serve_embedded_asset(Path(path): Path<String>) -> Response {
    match static_assets::Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.to_string()),
                    // Asset names are not content-hashed, so always revalidate
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => {
            tracing::debug!("Static asset not found: {}", path);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::get};
    use axum_test::TestServer;

    fn create_test_router() -> Router {
        Router::new().route("/assets/{*path}", get(serve_embedded_asset))
    }

    #[tokio::test]
    async fn test_serve_script() {
        let server = TestServer::new(create_test_router()).unwrap();

        let response = server.get("/assets/js/app.js").await;

        response.assert_status(StatusCode::OK);
        assert!(
            response
                .headers()
                .get("content-type")
                .map(|v| v.to_str().unwrap())
                .unwrap()
                .contains("javascript")
        );
        assert_eq!(
            response.headers().get("cache-control").map(|v| v.to_str().unwrap()),
            Some("no-cache")
        );
        assert!(response.text().contains("loadProducts"));
    }

    #[tokio::test]
    async fn test_serve_stylesheet() {
        let server = TestServer::new(create_test_router()).unwrap();

        let response = server.get("/assets/css/style.css").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").map(|v| v.to_str().unwrap()),
            Some("text/css")
        );
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found() {
        let server = TestServer::new(create_test_router()).unwrap();

        server.get("/assets/js/missing.js").await.assert_status(StatusCode::NOT_FOUND);
        server.get("/assets/../Cargo.toml").await.assert_status(StatusCode::NOT_FOUND);
    }
}
