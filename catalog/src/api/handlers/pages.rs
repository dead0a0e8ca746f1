//! Server-rendered pages.

use axum::{extract::State, response::Html};

use crate::{
    AppState,
    errors::{Error, Result},
};

/// The product management page. The table itself is fetched by the page script.
#[tracing::instrument(skip_all)]
pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let html = state
        .views
        .render_home()
        .map_err(|e| Error::Other(e.into()).or_internal("render page"))?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_server;

    #[tokio::test]
    async fn test_home_page() {
        let server = create_test_server();

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(
            response
                .headers()
                .get("content-type")
                .map(|v| v.to_str().unwrap())
                .unwrap()
                .starts_with("text/html")
        );
        let text = response.text();
        assert!(text.contains("Product management"));
        assert!(text.contains(r#"id="products-table""#));
    }
}
