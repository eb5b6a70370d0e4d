//! Render sinks that turn filtered transactions and their aggregates into
//! dashboard output.

use maud::{Markup, html};
use serde::Serialize;

use crate::{
    aggregation::AggregateView,
    dashboard::{
        charts::{build_dashboard_charts, charts_view},
        tables::transactions_table,
    },
    html::format_whole_number,
    render::RenderSink,
    transaction::TransactionRecord,
};

/// The id of the element that htmx swaps dashboard content into.
pub(super) const DASHBOARD_CONTENT_ID: &str = "dashboard-content";

/// Renders the dashboard content (summary, table and charts) as HTML.
#[derive(Debug, Clone)]
pub struct HtmlDashboard {
    total_transactions: Option<f64>,
    content: Markup,
}

impl HtmlDashboard {
    /// Create a sink that shows `total_transactions` in the summary.
    pub fn new(total_transactions: Option<f64>) -> Self {
        Self {
            total_transactions,
            content: html! {},
        }
    }

    /// The output of the most recent render.
    pub fn into_markup(self) -> Markup {
        self.content
    }
}

impl RenderSink for HtmlDashboard {
    fn render(&mut self, records: &[TransactionRecord], view: &AggregateView) {
        let charts = build_dashboard_charts(view);

        self.content = html! {
            (summary_view(self.total_transactions))
            (charts_view(&charts))
            (transactions_table(records))
        };
    }
}

fn summary_view(total_transactions: Option<f64>) -> Markup {
    html! {
        section id="summary" class="w-full mb-4"
        {
            div class="p-4 rounded-lg shadow bg-white dark:bg-gray-800"
            {
                h3 class="text-sm font-medium text-gray-500 dark:text-gray-400"
                {
                    "Total Transactions"
                }

                p class="balance-amount text-2xl font-bold"
                {
                    @match total_transactions {
                        Some(total) => { (format_whole_number(total)) " RWF" }
                        None => "-",
                    }
                }
            }
        }
    }
}

/// Shown in place of the dashboard content when there is no data at all.
pub(super) fn no_data_view() -> Markup {
    html! {
        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "No transactions to show" }

            p
            {
                "Charts will show up here once the data source returns some
                transactions. Check the server logs if you expected data here."
            }
        }
    }
}

/// Collects the filtered transactions and their aggregates for a JSON response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonDashboard {
    transactions: Vec<TransactionRecord>,
    aggregates: AggregateView,
}

impl RenderSink for JsonDashboard {
    fn render(&mut self, records: &[TransactionRecord], view: &AggregateView) {
        self.transactions = records.to_vec();
        self.aggregates = view.clone();
    }
}
