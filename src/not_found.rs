use axum::response::{IntoResponse, Response};

use crate::error_page::ErrorPage;

/// Fallback handler that renders the 404 page.
pub async fn get_404_not_found() -> Response {
    ErrorPage::not_found().into_response()
}
