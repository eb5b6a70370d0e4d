//! Aggregates transactions into the data behind the dashboard charts.
//!
//! Every aggregate sums the absolute volume of the transactions, so the
//! direction of a transaction never cancels out another one. Records with an
//! unknown amount contribute zero and records with an unknown date are left
//! out of the monthly series.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{category::Category, transaction::TransactionRecord};

/// The total volume of transactions in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyVolume {
    /// The short month name and year, e.g. "Jan 2024".
    pub label: String,
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 to 12.
    pub month: u8,
    /// The sum of absolute amounts.
    pub volume: f64,
}

/// The total volume of transactions in one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryVolume {
    /// The category.
    pub category: Category,
    /// The display label of the category.
    pub label: &'static str,
    /// The sum of absolute amounts.
    pub volume: f64,
}

/// The total volume of transactions sharing a display label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelVolume {
    /// The category display label.
    pub label: &'static str,
    /// The sum of absolute amounts.
    pub volume: f64,
}

/// Incoming funds versus everything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DepositsVsPayments {
    /// The volume of transactions in [Category::DEPOSITS].
    pub deposits: f64,
    /// The volume of all other transactions.
    pub payments: f64,
}

/// Everything the dashboard charts need, derived from one list of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateView {
    /// Volume per month, in chronological order.
    pub monthly_series: Vec<MonthlyVolume>,
    /// Volume per category, largest first, without empty categories.
    pub category_distribution: Vec<CategoryVolume>,
    /// Volume per category label, largest first.
    pub volume_by_label: Vec<LabelVolume>,
    /// The deposits vs. payments split.
    pub deposits_vs_payments: DepositsVsPayments,
}

/// Compute all four aggregates in a single pass over `records`.
///
/// The result is the same as calling [monthly_series], [category_distribution],
/// [volume_by_label] and [deposits_vs_payments] separately.
pub fn aggregate(records: &[TransactionRecord]) -> AggregateView {
    let mut accumulator = Accumulator::default();

    for record in records {
        accumulator.add(record);
    }

    accumulator.finish()
}

/// Sums absolute amounts by month, sorted by year then month.
pub fn monthly_series(records: &[TransactionRecord]) -> Vec<MonthlyVolume> {
    let mut totals = BTreeMap::new();

    for record in records {
        if let Some(date) = record.utc_date() {
            *totals.entry(month_key(date)).or_insert(0.0) += record.absolute_volume();
        }
    }

    into_monthly_series(totals)
}

/// Sums absolute amounts by category, largest first, dropping categories with no volume.
///
/// Ties keep catalog order.
pub fn category_distribution(records: &[TransactionRecord]) -> Vec<CategoryVolume> {
    let mut totals = [0.0; Category::ALL.len()];

    for record in records {
        totals[record.category().index()] += record.absolute_volume();
    }

    into_category_distribution(totals)
}

/// Sums absolute amounts by category display label, largest first.
///
/// Ties keep the order in which the labels first appear in `records`.
pub fn volume_by_label(records: &[TransactionRecord]) -> Vec<LabelVolume> {
    let mut totals: Vec<LabelVolume> = Vec::new();

    for record in records {
        add_to_label(&mut totals, record.category().label(), record.absolute_volume());
    }

    sort_descending(&mut totals, |total| total.volume);
    totals
}

/// Splits the absolute volume into deposits and payments.
pub fn deposits_vs_payments(records: &[TransactionRecord]) -> DepositsVsPayments {
    let mut split = DepositsVsPayments::default();

    for record in records {
        if record.category().is_deposit() {
            split.deposits += record.absolute_volume();
        } else {
            split.payments += record.absolute_volume();
        }
    }

    split
}

/// Running totals for every aggregate, filled in one record at a time.
#[derive(Debug, Default)]
struct Accumulator {
    months: BTreeMap<(i32, u8), f64>,
    categories: [f64; Category::ALL.len()],
    labels: Vec<LabelVolume>,
    split: DepositsVsPayments,
}

impl Accumulator {
    fn add(&mut self, record: &TransactionRecord) {
        let volume = record.absolute_volume();
        let category = record.category();

        if let Some(date) = record.utc_date() {
            *self.months.entry(month_key(date)).or_insert(0.0) += volume;
        }

        self.categories[category.index()] += volume;
        add_to_label(&mut self.labels, category.label(), volume);

        if category.is_deposit() {
            self.split.deposits += volume;
        } else {
            self.split.payments += volume;
        }
    }

    fn finish(mut self) -> AggregateView {
        sort_descending(&mut self.labels, |total| total.volume);

        AggregateView {
            monthly_series: into_monthly_series(self.months),
            category_distribution: into_category_distribution(self.categories),
            volume_by_label: self.labels,
            deposits_vs_payments: self.split,
        }
    }
}

/// Sortable (year, month number) key for a date.
fn month_key(date: Date) -> (i32, u8) {
    (date.year(), u8::from(date.month()))
}

fn into_monthly_series(totals: BTreeMap<(i32, u8), f64>) -> Vec<MonthlyVolume> {
    totals
        .into_iter()
        .map(|((year, month), volume)| MonthlyVolume {
            label: format_month_label(year, month),
            year,
            month,
            volume,
        })
        .collect()
}

fn into_category_distribution(totals: [f64; Category::ALL.len()]) -> Vec<CategoryVolume> {
    let mut distribution: Vec<CategoryVolume> = Category::ALL
        .into_iter()
        .zip(totals)
        .map(|(category, volume)| CategoryVolume {
            category,
            label: category.label(),
            volume,
        })
        .collect();

    sort_descending(&mut distribution, |total| total.volume);
    distribution.retain(|total| total.volume > 0.0);
    distribution
}

fn add_to_label(totals: &mut Vec<LabelVolume>, label: &'static str, volume: f64) {
    match totals.iter_mut().find(|total| total.label == label) {
        Some(total) => total.volume += volume,
        None => totals.push(LabelVolume { label, volume }),
    }
}

/// Stable sort, largest value first.
fn sort_descending<T>(items: &mut [T], value: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| value(b).total_cmp(&value(a)));
}

/// Formats a month as a three-letter abbreviation followed by the year, e.g. "Jan 2024".
///
/// `month` is the month number, 1 to 12.
pub(crate) fn format_month_label(year: i32, month: u8) -> String {
    const MONTH_NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let name = MONTH_NAMES
        .get(usize::from(month).wrapping_sub(1))
        .copied()
        .unwrap_or("???");

    format!("{name} {year}")
}
