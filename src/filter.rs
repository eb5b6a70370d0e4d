//! Client-side filtering of the stored transactions by date, amount and category.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, category::Category, transaction::TransactionRecord};

/// The filters selected on the dashboard.
///
/// Each field narrows the result and the fields combine as a logical AND.
/// A criteria with every field empty matches every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Keep records that occurred on this calendar day (UTC).
    pub exact_date: Option<Date>,
    /// Keep records whose amount, truncated toward zero, equals this value.
    pub exact_amount: Option<i64>,
    /// Keep records in this category.
    pub category: Option<Category>,
}

impl FilterCriteria {
    /// A criteria that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match records on `date`.
    pub fn date(mut self, date: Date) -> Self {
        self.exact_date = Some(date);
        self
    }

    /// Only match records whose truncated amount equals `amount`.
    pub fn amount(mut self, amount: i64) -> Self {
        self.exact_amount = Some(amount);
        self
    }

    /// Only match records in `category`.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.exact_date.is_none() && self.exact_amount.is_none() && self.category.is_none()
    }

    /// Whether `record` passes every set filter.
    ///
    /// Records with an unknown amount or date never match the corresponding filter.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        // Cheapest checks first, the date check needs an offset conversion.
        self.category
            .is_none_or(|category| record.category() == category)
            && self
                .exact_amount
                .is_none_or(|amount| record.truncated_amount() == Some(amount))
            && self
                .exact_date
                .is_none_or(|date| record.utc_date() == Some(date))
    }
}

/// Get the records in `records` that match `criteria`, keeping their relative order.
pub fn apply(records: &[TransactionRecord], criteria: &FilterCriteria) -> Vec<TransactionRecord> {
    if criteria.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| criteria.matches(record))
        .copied()
        .collect()
}

/// The filter controls as submitted by the dashboard.
///
/// Empty strings mean the filter is not set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterForm {
    /// A date in the format YYYY-MM-DD.
    #[serde(default)]
    pub date: String,
    /// A decimal number, any fractional part is dropped.
    #[serde(default)]
    pub amount: String,
    /// A category key.
    #[serde(default)]
    pub category: String,
}

impl TryFrom<&FilterForm> for FilterCriteria {
    type Error = Error;

    fn try_from(form: &FilterForm) -> Result<Self, Self::Error> {
        const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

        let mut criteria = FilterCriteria::new();

        let date = form.date.trim();
        if !date.is_empty() {
            let date = Date::parse(date, DATE_FORMAT)
                .map_err(|error| Error::InvalidFilter(format!("invalid date \"{date}\": {error}")))?;
            criteria = criteria.date(date);
        }

        let amount = form.amount.trim();
        if !amount.is_empty() {
            let amount = amount
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite())
                .ok_or_else(|| Error::InvalidFilter(format!("invalid amount \"{amount}\"")))?;
            criteria = criteria.amount(amount.trunc() as i64);
        }

        let category = form.category.trim();
        if !category.is_empty() {
            criteria = criteria.category(category.parse()?);
        }

        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{Error, category::Category, transaction::TransactionRecord};

    use super::{FilterCriteria, FilterForm, apply};

    fn sample_records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new(
                Some(datetime!(2024-01-15 10:00 UTC)),
                Category::IncomingMoney,
                Some(1000.0),
            ),
            TransactionRecord::new(
                Some(datetime!(2024-01-20 09:30 UTC)),
                Category::Withdrawal,
                Some(-500.0),
            ),
            TransactionRecord::new(
                Some(datetime!(2024-02-01 18:45 UTC)),
                Category::BankDeposits,
                Some(2000.0),
            ),
        ]
    }

    fn all_criteria() -> Vec<FilterCriteria> {
        let dates = [None, Some(date!(2024 - 01 - 15)), Some(date!(2024 - 03 - 01))];
        let amounts = [None, Some(-500), Some(1000), Some(7)];
        let categories = [None, Some(Category::Withdrawal), Some(Category::Pack)];

        let mut criteria = Vec::new();
        for exact_date in dates {
            for exact_amount in amounts {
                for category in categories {
                    criteria.push(FilterCriteria {
                        exact_date,
                        exact_amount,
                        category,
                    });
                }
            }
        }
        criteria
    }

    #[test]
    fn empty_criteria_is_identity() {
        let records = sample_records();

        assert_eq!(apply(&records, &FilterCriteria::new()), records);
    }

    #[test]
    fn apply_is_idempotent() {
        let records = sample_records();

        for criteria in all_criteria() {
            let once = apply(&records, &criteria);
            let twice = apply(&once, &criteria);
            assert_eq!(once, twice, "not idempotent for {criteria:?}");
        }
    }

    #[test]
    fn predicate_order_does_not_change_result() {
        let records = sample_records();

        for criteria in all_criteria() {
            let combined = apply(&records, &criteria);

            let by_date = apply(
                &records,
                &FilterCriteria {
                    exact_date: criteria.exact_date,
                    ..Default::default()
                },
            );
            let by_amount = apply(
                &by_date,
                &FilterCriteria {
                    exact_amount: criteria.exact_amount,
                    ..Default::default()
                },
            );
            let stepwise = apply(
                &by_amount,
                &FilterCriteria {
                    category: criteria.category,
                    ..Default::default()
                },
            );

            assert_eq!(combined, stepwise, "mismatch for {criteria:?}");
        }
    }

    #[test]
    fn filters_by_calendar_day() {
        let records = sample_records();

        let filtered = apply(&records, &FilterCriteria::new().date(date!(2024 - 01 - 15)));

        assert_eq!(filtered, vec![records[0]]);
    }

    #[test]
    fn date_filter_uses_utc_day() {
        let late_evening = TransactionRecord::new(
            Some(datetime!(2024-01-15 23:30 -02:00)),
            Category::Pack,
            Some(100.0),
        );

        let on_15th = apply(&[late_evening], &FilterCriteria::new().date(date!(2024 - 01 - 15)));
        let on_16th = apply(&[late_evening], &FilterCriteria::new().date(date!(2024 - 01 - 16)));

        assert!(on_15th.is_empty());
        assert_eq!(on_16th, vec![late_evening]);
    }

    #[test]
    fn filters_by_signed_truncated_amount() {
        let records = sample_records();

        let filtered = apply(&records, &FilterCriteria::new().amount(-500));
        assert_eq!(filtered, vec![records[1]]);

        let filtered = apply(&records, &FilterCriteria::new().amount(500));
        assert!(filtered.is_empty());
    }

    #[test]
    fn amount_filter_ignores_fractional_part() {
        let record = TransactionRecord::new(None, Category::CashPower, Some(1500.99));

        let filtered = apply(&[record], &FilterCriteria::new().amount(1500));

        assert_eq!(filtered, vec![record]);
    }

    #[test]
    fn filters_by_category() {
        let records = sample_records();

        let filtered = apply(
            &records,
            &FilterCriteria::new().category(Category::BankDeposits),
        );

        assert_eq!(filtered, vec![records[2]]);
    }

    #[test]
    fn filters_combine_as_and() {
        let records = sample_records();

        let criteria = FilterCriteria::new()
            .date(date!(2024 - 01 - 20))
            .category(Category::IncomingMoney);

        assert!(apply(&records, &criteria).is_empty());
    }

    #[test]
    fn unparseable_fields_match_nothing() {
        let broken = TransactionRecord::new(None, Category::Withdrawal, None);

        assert!(apply(&[broken], &FilterCriteria::new().amount(0)).is_empty());
        assert!(apply(&[broken], &FilterCriteria::new().date(date!(2024 - 01 - 15))).is_empty());
        assert_eq!(
            apply(&[broken], &FilterCriteria::new().category(Category::Withdrawal)),
            vec![broken]
        );
    }

    #[test]
    fn empty_form_gives_empty_criteria() {
        let criteria = FilterCriteria::try_from(&FilterForm::default()).unwrap();

        assert!(criteria.is_empty());
    }

    #[test]
    fn form_converts_to_criteria() {
        let form = FilterForm {
            date: "2024-01-15".to_owned(),
            amount: "-500.9".to_owned(),
            category: "withdrawal".to_owned(),
        };

        let criteria = FilterCriteria::try_from(&form).unwrap();

        assert_eq!(
            criteria,
            FilterCriteria::new()
                .date(date!(2024 - 01 - 15))
                .amount(-500)
                .category(Category::Withdrawal)
        );
    }

    #[test]
    fn form_rejects_invalid_values() {
        let bad_date = FilterForm {
            date: "15/01/2024".to_owned(),
            ..Default::default()
        };
        let bad_amount = FilterForm {
            amount: "lots".to_owned(),
            ..Default::default()
        };
        let bad_category = FilterForm {
            category: "lottery".to_owned(),
            ..Default::default()
        };

        for form in [bad_date, bad_amount, bad_category] {
            assert!(
                matches!(FilterCriteria::try_from(&form), Err(Error::InvalidFilter(_))),
                "expected {form:?} to be rejected"
            );
        }
    }

    #[test]
    fn form_decodes_from_query_string() {
        let form: FilterForm =
            serde_html_form::from_str("date=2024-01-15&amount=&category=pack").unwrap();

        assert_eq!(form.date, "2024-01-15");
        assert_eq!(form.amount, "");
        assert_eq!(form.category, "pack");

        let form: FilterForm = serde_html_form::from_str("").unwrap();
        assert_eq!(form, FilterForm::default());
    }
}
