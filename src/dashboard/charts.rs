//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for the aggregates:
//! - **Monthly Volume**: Line chart of the total volume per month
//! - **Category Distribution**: Doughnut chart of volume per category
//! - **Volume by Type**: Horizontal bar chart of volume per category label
//! - **Deposits vs Payments**: Pie chart of incoming funds vs. everything else
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Orient, Tooltip,
        Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::aggregation::AggregateView;

const COLORS: [&str; 11] = [
    "#42b883", "#ff6384", "#36a2eb", "#ffcd56", "#ff9f40", "#4bc0c0", "#9966ff", "#c9cbcf",
    "#ff9999", "#99ff99", "#99ccff",
];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Creates the four dashboard charts from the aggregates.
pub(super) fn build_dashboard_charts(view: &AggregateView) -> [DashboardChart; 4] {
    [
        DashboardChart {
            id: "monthly-volume-chart",
            options: monthly_volume_chart(view).to_string(),
        },
        DashboardChart {
            id: "category-distribution-chart",
            options: category_distribution_chart(view).to_string(),
        },
        DashboardChart {
            id: "volume-by-type-chart",
            options: volume_by_type_chart(view).to_string(),
        },
        DashboardChart {
            id: "deposits-vs-payments-chart",
            options: deposits_vs_payments_chart(view).to_string(),
        },
    ]
}

/// Renders the chart containers followed by the script that initializes them.
///
/// The script is inline so that charts are initialized again whenever htmx
/// swaps in new dashboard content.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }

        script { (charts_script(charts)) }
    )
}

/// The global that maps chart element IDs to their live ECharts instances.
const CHART_REGISTRY: &str = "dashboardCharts";

/// Generates JavaScript initialization code for dashboard charts with dark
/// mode support and responsive resizing.
///
/// The script runs again on every htmx swap. Instances are kept in a page-wide
/// registry keyed by chart ID: the previous instance for an ID is disposed
/// before the new one is created, and the resize and theme listeners are
/// registered only once per page.
fn charts_script(charts: &[DashboardChart]) -> PreEscaped<String> {
    let prelude = format!(
        r#"if (typeof echarts !== "undefined") {{
            const charts = window.{CHART_REGISTRY} = window.{CHART_REGISTRY} || {{}};
            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const applyTheme = (chart) => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};

            if (!window.{CHART_REGISTRY}Listening) {{
                window.{CHART_REGISTRY}Listening = true;
                window.addEventListener('resize', () => {{
                    Object.values(charts).forEach((chart) => chart.resize());
                }});
                darkModeMediaQuery.addEventListener('change', () => {{
                    Object.values(charts).forEach(applyTheme);
                }});
            }}
"#
    );

    let chart_blocks = charts
        .iter()
        .map(|chart| {
            format!(
                r#"            (function() {{
                const id = "{}";
                const previous = charts[id];
                if (previous && !previous.isDisposed()) {{
                    previous.dispose();
                }}
                delete charts[id];

                const chartDom = document.getElementById(id);
                if (!chartDom) {{
                    return;
                }}
                const chart = echarts.init(chartDom);
                const option = {};
                chart.setOption(option);
                applyTheme(chart);
                charts[id] = chart;
            }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(format!("{prelude}{chart_blocks}\n}}"))
}

pub(super) fn monthly_volume_chart(view: &AggregateView) -> Chart {
    let labels: Vec<String> = view
        .monthly_series
        .iter()
        .map(|month| month.label.clone())
        .collect();
    let values: Vec<f64> = view.monthly_series.iter().map(|month| month.volume).collect();

    Chart::new()
        .title(Title::new().text("Monthly Transaction Volume"))
        .color(vec![Color::from(COLORS[0])])
        .tooltip(currency_tooltip())
        .grid(standard_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Volume").smooth(true).data(values))
}

pub(super) fn category_distribution_chart(view: &AggregateView) -> Chart {
    let data: Vec<(f64, &str)> = view
        .category_distribution
        .iter()
        .map(|total| (total.volume, total.label))
        .collect();

    Chart::new()
        .title(Title::new().text("Transaction Distribution"))
        .color(palette())
        .tooltip(percentage_tooltip())
        .legend(Legend::new().orient(Orient::Vertical).right(10).top("middle"))
        .series(
            Pie::new()
                .name("Category")
                .radius(vec!["40%", "70%"])
                .center(vec!["35%", "55%"])
                .data(data),
        )
}

pub(super) fn volume_by_type_chart(view: &AggregateView) -> Chart {
    let labels: Vec<&str> = view.volume_by_label.iter().map(|total| total.label).collect();
    let values: Vec<f64> = view.volume_by_label.iter().map(|total| total.volume).collect();

    Chart::new()
        .title(Title::new().text("Transaction Volume by Type"))
        .color(palette())
        .tooltip(currency_tooltip())
        .grid(standard_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .y_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(Bar::new().name("Volume").data(values))
}

pub(super) fn deposits_vs_payments_chart(view: &AggregateView) -> Chart {
    let split = view.deposits_vs_payments;

    Chart::new()
        .title(Title::new().text("Deposits vs Payments"))
        .color(vec![Color::from(COLORS[0]), Color::from(COLORS[1])])
        .tooltip(percentage_tooltip())
        .legend(Legend::new().orient(Orient::Vertical).right(10).top("middle"))
        .series(
            Pie::new()
                .name("Direction")
                .radius("65%")
                .center(vec!["40%", "55%"])
                .data(vec![(split.deposits, "Deposits"), (split.payments, "Payments")]),
        )
}

fn palette() -> Vec<Color> {
    COLORS.iter().map(|&color| color.into()).collect()
}

fn standard_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const amountFormatter = new Intl.NumberFormat('en-US', {
              maximumFractionDigits: 0
            });
            return 'RWF ' + amountFormatter.format(number);",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

/// Creates a tooltip that shows the value and its share of the total.
///
/// ECharts computes the percentage, so the aggregates never need to.
fn percentage_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Item)
        .formatter("{b}: RWF {c} ({d}%)")
}
