//! Full page responses for requests that fail outside of htmx.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// An error page showing the status code, what went wrong and how to fix it.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for ErrorPage<'_> {
    fn default() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl<'a> ErrorPage<'a> {
    /// A 400 page for a request the user can correct.
    pub fn bad_request(description: &'a str, fix: &'a str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            description,
            fix,
        }
    }

    /// A 404 page for a route that does not exist.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            description: "Something's missing.",
            fix: "Sorry, we can't find that page. You'll find lots to explore on the dashboard.",
        }
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        let title = self.status.canonical_reason().unwrap_or("Error");
        let markup = error_view(title, self.status.as_str(), self.description, self.fix);

        (self.status, Html(markup.into_string())).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    ErrorPage::default().into_response()
}
