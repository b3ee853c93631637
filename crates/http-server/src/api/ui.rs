use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serves the single-page control panel.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}
