//! Root document

use axum::{response::Html, routing::get, Router};

/// Embedded at build time; not part of the API surface.
const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET /
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(index))
}
