//! Alert messages shown to the user after a failed htmx request.

use maud::{Markup, html};

/// An error message swapped into the page's alert container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// A short summary of what went wrong.
    pub message: String,
    /// What the user can do about it.
    pub details: String,
}

impl Alert {
    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert with a dismiss button.
    pub fn into_html(self) -> Markup {
        html! {
            div
                role="alert"
                class="flex items-start p-4 mb-4 rounded-lg shadow-lg text-red-800
                    bg-red-50 border border-red-300 dark:bg-gray-800 dark:text-red-400
                    dark:border-red-800"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ml-4 text-lg leading-none"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}
