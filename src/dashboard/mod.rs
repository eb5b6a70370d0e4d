//! Dashboard module
//!
//! Provides the dashboard page: filter controls, a summary of the total, the
//! transactions table and charts of the aggregates. The content is re-rendered
//! through a [RenderSink](crate::render::RenderSink) on every filter change.

mod charts;
mod handlers;
mod sink;
mod tables;

pub use handlers::{get_aggregates, get_dashboard_page, get_dashboard_partial};
pub use sink::{HtmlDashboard, JsonDashboard};
