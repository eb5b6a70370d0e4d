//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for the dashboard content, used by the filter controls.
pub const DASHBOARD_API: &str = "/api/dashboard";
/// The route for the filtered transactions and their aggregates as JSON.
pub const AGGREGATES_API: &str = "/api/aggregates";
