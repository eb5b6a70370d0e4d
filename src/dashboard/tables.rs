//! The transactions table shown under the dashboard charts.

use maud::{Markup, html};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_rwf},
    transaction::TransactionRecord,
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for credits, red for debits).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

fn format_date(date: Option<OffsetDateTime>) -> String {
    const DISPLAY_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day] [hour]:[minute]");

    date.and_then(|date| date.format(DISPLAY_FORMAT).ok())
        .unwrap_or_else(|| "-".to_owned())
}

/// Renders one row per record, in the order given.
///
/// Amounts are shown without their sign, the color carries the direction.
pub(super) fn transactions_table(records: &[TransactionRecord]) -> Markup {
    html! {
        section id="transactions" class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Transactions" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="transactions-table w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                        }
                    }

                    tbody
                    {
                        @for record in records {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (format_date(record.date())) }
                                td class=(TABLE_CELL_STYLE) { (record.category().label()) }
                                @match record.amount() {
                                    Some(amount) => {
                                        td class={(TABLE_CELL_STYLE) " " (amount_color_class(amount))}
                                        {
                                            (format_rwf(amount.abs()))
                                        }
                                    }
                                    None => td class=(TABLE_CELL_STYLE) { "-" }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @match record.balance() {
                                        Some(balance) => (format_rwf(balance)),
                                        None => "-",
                                    }
                                }
                            }
                        }

                        @if records.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="4" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No transactions match the selected filters."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
