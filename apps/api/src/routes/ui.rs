use axum::response::Html;

/// GET /
/// Serves the single-page analysis UI that drives the resume endpoints.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
