//! The seam between the data pipeline and whatever displays its output.

use crate::{aggregation::AggregateView, transaction::TransactionRecord};

/// Consumes a filtered transaction list and its aggregates for display.
///
/// A sink may be rendered to any number of times. Each call fully replaces
/// whatever the previous call produced.
pub trait RenderSink {
    /// Display `records` as a table and `view` as charts.
    fn render(&mut self, records: &[TransactionRecord], view: &AggregateView);
}
