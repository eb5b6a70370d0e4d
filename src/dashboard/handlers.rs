//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the full page, the htmx partial and the JSON aggregates
//! - The filter controls shown above the dashboard content
//! - The state type used by the handlers

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxRequest;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    aggregation::aggregate,
    category::Category,
    dashboard::sink::{DASHBOARD_CONTENT_ID, HtmlDashboard, JsonDashboard, no_data_view},
    endpoints,
    filter::{FilterCriteria, FilterForm, apply},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base,
    },
    render::RenderSink,
    store::TransactionStore,
};

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The transactions fetched from the data source.
    pub store: Arc<Mutex<TransactionStore>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Display the dashboard with the filters in the query string already applied.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(form): Query<FilterForm>,
) -> Result<Response, Error> {
    let criteria = FilterCriteria::try_from(&form)?;
    let content = render_dashboard(&state, &criteria)?;

    Ok(dashboard_view(&form, content).into_response())
}

/// Render the dashboard content for the filters in the query string.
///
/// Used by the filter controls to update the dashboard without reloading the
/// page. Plain browser requests are redirected to the full page.
pub async fn get_dashboard_partial(
    HxRequest(is_htmx_request): HxRequest,
    RawQuery(query): RawQuery,
    State(state): State<DashboardState>,
    Query(form): Query<FilterForm>,
) -> Response {
    if !is_htmx_request {
        let location = match query {
            Some(query) if !query.is_empty() => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
            _ => endpoints::DASHBOARD_VIEW.to_owned(),
        };

        return Redirect::to(&location).into_response();
    }

    let criteria = match FilterCriteria::try_from(&form) {
        Ok(criteria) => criteria,
        Err(error) => {
            tracing::debug!("rejected dashboard filters {form:?}: {error}");
            return error.into_alert_response();
        }
    };

    match render_dashboard(&state, &criteria) {
        Ok(content) => content.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Get the filtered transactions and their aggregates as JSON.
pub async fn get_aggregates(
    State(state): State<DashboardState>,
    Query(form): Query<FilterForm>,
) -> Result<Json<JsonDashboard>, Error> {
    let criteria = FilterCriteria::try_from(&form)?;

    let store = state
        .store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire store lock: {error}"))
        .map_err(|_| Error::StoreLockError)?;

    let mut sink = JsonDashboard::default();
    filter_and_render(&store, &criteria, &mut sink);

    Ok(Json(sink))
}

/// Run the filter and aggregation pipeline over the store into an HTML sink.
///
/// Returns the empty state if the store holds no transactions at all.
fn render_dashboard(state: &DashboardState, criteria: &FilterCriteria) -> Result<Markup, Error> {
    let store = state
        .store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire store lock: {error}"))
        .map_err(|_| Error::StoreLockError)?;

    if store.is_empty() {
        return Ok(no_data_view());
    }

    let mut sink = HtmlDashboard::new(store.total_transactions());
    filter_and_render(&store, criteria, &mut sink);

    Ok(sink.into_markup())
}

fn filter_and_render(
    store: &TransactionStore,
    criteria: &FilterCriteria,
    sink: &mut impl RenderSink,
) {
    let records = apply(store.all(), criteria);
    let view = aggregate(&records);

    tracing::debug!(
        "filters {criteria:?} kept {} of {} transactions",
        records.len(),
        store.all().len()
    );

    sink.render(&records, &view);
}

/// Renders the full dashboard page with the filter controls and `content`.
fn dashboard_view(form: &FilterForm, content: Markup) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6 w-full" { "MoMo Transactions Dashboard" }

            (filter_controls(form))

            div id=(DASHBOARD_CONTENT_ID) class="w-full"
            {
                (content)
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    base("Dashboard", &scripts, &content)
}

const CLEAR_FILTERS_SCRIPT: &str =
    "this.form.querySelectorAll('input, select').forEach((field) => field.value = '')";

fn filter_controls(form: &FilterForm) -> Markup {
    let selected_category = form.category.trim();

    html!(
        form
            id="filters"
            hx-get=(endpoints::DASHBOARD_API)
            hx-target={"#" (DASHBOARD_CONTENT_ID)}
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-trigger="change, input delay:300ms"
            hx-sync="this:replace"
            class="w-full mb-8 p-4 rounded-lg bg-gray-50 dark:bg-gray-800"
        {
            div class="grid grid-cols-1 md:grid-cols-4 gap-4 items-end"
            {
                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        id="date"
                        name="date"
                        value=(form.date)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        type="number"
                        id="amount"
                        name="amount"
                        step="any"
                        placeholder="Search by amount"
                        value=(form.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Type" }
                    select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[selected_category.is_empty()] { "All Types" }

                        @for category in Category::ALL {
                            option
                                value=(category.key())
                                selected[selected_category == category.key()]
                            {
                                (category.label())
                            }
                        }
                    }
                }

                // Clears the fields in place and fetches the unfiltered content.
                button
                    type="button"
                    id="reset-filters"
                    hx-get=(endpoints::DASHBOARD_API)
                    hx-sync="closest form:replace"
                    "hx-on::before-request"=(CLEAR_FILTERS_SCRIPT)
                    class={(BUTTON_SECONDARY_STYLE) " text-center"}
                {
                    "Reset Filters"
                }
            }
        }
    )
}
