//! A dashboard for mobile money (MoMo) transactions.
//!
//! The transactions are fetched once from a backend endpoint or a JSON file
//! and held in memory. Every view of the dashboard (the transactions table,
//! the summary and the charts) is derived from the filtered transactions:
//!
//! - [category] maps backend category keys to display labels.
//! - [store] holds the fetched transactions.
//! - [filter] narrows them down by date, amount and category.
//! - [aggregation] reduces them to the series the charts display.
//! - [render] is the seam between that pipeline and its output.
//!
//! This library also provides the HTTP server that serves the dashboard as
//! HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

pub mod aggregation;
mod alert;
mod app_state;
pub mod category;
mod dashboard;
mod endpoints;
mod error_page;
pub mod filter;
mod html;
mod logging;
mod not_found;
pub mod render;
mod routing;
pub mod source;
pub mod store;
pub mod transaction;

pub use app_state::AppState;
pub use dashboard::{HtmlDashboard, JsonDashboard};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use source::{DataSource, Source};

use crate::{alert::Alert, error_page::ErrorPage};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The data source could not be reached or returned an error status.
    #[error("could not fetch transactions: {0}")]
    DataFetch(String),

    /// The data source returned something other than a list of transactions.
    #[error("the transaction data is malformed: {0}")]
    MalformedData(String),

    /// A dashboard filter could not be parsed.
    ///
    /// The string describes which filter was invalid and should be shown to
    /// the user so they can correct it.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Could not acquire the lock on the transaction store.
    #[error("could not acquire the transaction store lock")]
    StoreLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidFilter(description) => ErrorPage::bad_request(
                "Invalid Filter",
                &format!("{description}. Fix the filter or reset the filters to see everything."),
            )
            .into_response(),
            Error::StoreLockError => ErrorPage::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidFilter(description) => (
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid filter", &description),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn invalid_filter_is_a_bad_request() {
        let error = Error::InvalidFilter("invalid amount \"abc\"".to_owned());

        assert_eq!(error.clone().into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.into_alert_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_errors_are_internal_server_errors() {
        for error in [
            Error::DataFetch("connection refused".to_owned()),
            Error::MalformedData("expected a sequence".to_owned()),
            Error::StoreLockError,
        ] {
            assert_eq!(
                error.clone().into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
            assert_eq!(
                error.into_alert_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
