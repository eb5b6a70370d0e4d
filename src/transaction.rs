//! Transaction records and their lenient ingestion from the backend's wire format.
//!
//! The backend returns rows where numbers may be JSON numbers or numeric strings
//! and dates come in a handful of textual formats. Converting a
//! [RawTransaction] into a [TransactionRecord] never fails: fields that cannot
//! be parsed are kept as `None` and the filter and aggregation code treats them
//! as matching nothing and contributing zero.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::category::Category;

/// A single mobile-money transaction.
///
/// Records are immutable once created, derived views only ever read them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransactionRecord {
    id: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    date: Option<OffsetDateTime>,
    category: Category,
    amount: Option<f64>,
    balance: Option<f64>,
}

impl TransactionRecord {
    /// Create a record from already parsed fields.
    ///
    /// Non-finite amounts are treated the same as a missing amount.
    pub fn new(date: Option<OffsetDateTime>, category: Category, amount: Option<f64>) -> Self {
        Self {
            id: None,
            date,
            category,
            amount: amount.filter(|amount| amount.is_finite()),
            balance: None,
        }
    }

    /// Set the backend row ID.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the account balance after the transaction.
    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance).filter(|balance| balance.is_finite());
        self
    }

    /// The backend row ID, if the source provided one.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// When the transaction occurred, `None` if the source date could not be parsed.
    pub fn date(&self) -> Option<OffsetDateTime> {
        self.date
    }

    /// The calendar day of the transaction in UTC.
    pub fn utc_date(&self) -> Option<Date> {
        self.date
            .map(|date| date.to_offset(time::UtcOffset::UTC).date())
    }

    /// The transaction category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The signed amount, `None` if the source amount could not be parsed.
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// The account balance after the transaction. Only used for display.
    pub fn balance(&self) -> Option<f64> {
        self.balance
    }

    /// The magnitude of the amount, or zero if the amount is unknown.
    pub fn absolute_volume(&self) -> f64 {
        self.amount.map(f64::abs).unwrap_or(0.0)
    }

    /// The amount truncated toward zero, keeping its sign.
    pub fn truncated_amount(&self) -> Option<i64> {
        self.amount.map(|amount| amount.trunc() as i64)
    }
}

/// A number as sent by the backend, usually a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// A JSON number.
    Number(f64),
    /// A string that may or may not contain a number.
    Text(String),
    /// Any other JSON value, e.g. a boolean or an object. Never has a value.
    Other(Value),
}

impl RawNumber {
    /// The finite numeric value, if there is one.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(number) => Some(*number),
            RawNumber::Text(text) => text.trim().parse::<f64>().ok(),
            RawNumber::Other(_) => None,
        };

        value.filter(|value| value.is_finite())
    }
}

/// A transaction row exactly as the backend read endpoint returns it.
///
/// Any JSON object deserializes into a row: fields of an unexpected type are
/// read as `None` (or [RawNumber::Other]) instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTransaction {
    /// The backend row ID.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    /// The signed amount.
    #[serde(default)]
    pub amount: Option<RawNumber>,
    /// The account balance after the transaction.
    #[serde(default)]
    pub balance: Option<RawNumber>,
    /// When the transaction occurred.
    #[serde(default, deserialize_with = "lenient_text")]
    pub readable_date: Option<String>,
    /// The category key.
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    /// The pre-aggregated total, only meaningful on the first row.
    #[serde(default)]
    pub total_transactions: Option<RawNumber>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => {
            tracing::warn!("expected a string but got {other}, ignoring it");
            None
        }
    })
}

impl From<RawTransaction> for TransactionRecord {
    fn from(raw: RawTransaction) -> Self {
        let amount = raw.amount.as_ref().and_then(RawNumber::value);
        if amount.is_none() {
            tracing::warn!(
                "transaction {:?} has an unreadable amount {:?}, treating it as zero",
                raw.id,
                raw.amount
            );
        }

        let date = raw.readable_date.as_deref().and_then(parse_timestamp);
        if date.is_none() {
            tracing::warn!(
                "transaction {:?} has an unreadable date {:?}, it will not match date filters",
                raw.id,
                raw.readable_date
            );
        }

        let category = match raw.category.as_deref() {
            Some(key) => {
                let category = Category::from_key(key);
                if category == Category::Uncategorized && key != Category::Uncategorized.key() {
                    tracing::warn!(
                        "transaction {:?} has unknown category \"{key}\", using \"{}\"",
                        raw.id,
                        Category::Uncategorized.key()
                    );
                }
                category
            }
            None => Category::Uncategorized,
        };

        let mut record = TransactionRecord::new(date, category, amount);

        if let Some(id) = raw.id {
            record = record.with_id(id);
        }

        if let Some(balance) = raw.balance.as_ref().and_then(RawNumber::value) {
            record = record.with_balance(balance);
        }

        record
    }
}

/// Parse a timestamp in any of the formats the backend is known to produce.
///
/// Formats without an offset are interpreted as UTC. Returns `None` if `text`
/// matches none of them.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    // e.g. "Mon, 15 Jan 2024 10:00:00 GMT"
    const HTTP_DATE_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    const SPACED_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    const T_SEPARATED_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    // e.g. "15 Jan 2024 4:30:58 PM"
    const SMS_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[day padding:none] [month repr:short] [year] [hour repr:12 padding:none]:[minute]:[second] [period]"
    );
    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time);
    }

    [
        HTTP_DATE_FORMAT,
        SPACED_FORMAT,
        T_SEPARATED_FORMAT,
        SMS_FORMAT,
    ]
    .into_iter()
    .find_map(|format| PrimitiveDateTime::parse(text, format).ok())
    .or_else(|| {
        Date::parse(text, DATE_FORMAT)
            .ok()
            .map(|date| date.midnight())
    })
    .map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::category::Category;

    use super::{RawNumber, RawTransaction, TransactionRecord, parse_timestamp};

    #[test]
    fn parses_supported_timestamp_formats() {
        let expected = datetime!(2024-01-15 16:30:58 UTC);

        assert_eq!(parse_timestamp("2024-01-15T16:30:58Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15 16:30:58"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T16:30:58"), Some(expected));
        assert_eq!(
            parse_timestamp("Mon, 15 Jan 2024 16:30:58 GMT"),
            Some(expected)
        );
        assert_eq!(parse_timestamp("15 Jan 2024 4:30:58 PM"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-15"),
            Some(datetime!(2024-01-15 0:00 UTC))
        );
    }

    #[test]
    fn keeps_offset_from_rfc3339() {
        let parsed = parse_timestamp("2024-01-15T23:30:00-02:00").unwrap();
        let record = TransactionRecord::new(Some(parsed), Category::Pack, Some(1.0));

        // 23:30 at UTC-2 is the next day in UTC.
        assert_eq!(record.utc_date(), Some(date!(2024 - 01 - 16)));
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn raw_numbers_accept_numbers_and_numeric_strings() {
        assert_eq!(RawNumber::Number(12.5).value(), Some(12.5));
        assert_eq!(RawNumber::Text(" -500.00 ".to_owned()).value(), Some(-500.0));
        assert_eq!(RawNumber::Text("Unknown".to_owned()).value(), None);
        assert_eq!(RawNumber::Text("NaN".to_owned()).value(), None);
        assert_eq!(RawNumber::Text("inf".to_owned()).value(), None);
    }

    #[test]
    fn deserializes_backend_row() {
        let json = r#"{
            "id": 7,
            "body": "You have received 1,000 RWF from Jane.",
            "amount": "1000.00",
            "balance": 2500,
            "readable_date": "Mon, 15 Jan 2024 10:00:00 GMT",
            "category": "incoming_money",
            "total_transactions": "3500.00"
        }"#;

        let raw: RawTransaction = serde_json::from_str(json).unwrap();
        let record = TransactionRecord::from(raw);

        assert_eq!(record.id(), Some(7));
        assert_eq!(record.amount(), Some(1000.0));
        assert_eq!(record.balance(), Some(2500.0));
        assert_eq!(record.category(), Category::IncomingMoney);
        assert_eq!(record.date(), Some(datetime!(2024-01-15 10:00 UTC)));
    }

    #[test]
    fn malformed_fields_are_tolerated() {
        let raw = RawTransaction {
            id: Some(1),
            amount: Some(RawNumber::Text("Unknown".to_owned())),
            balance: None,
            readable_date: Some("not a date".to_owned()),
            category: Some("lottery".to_owned()),
            total_transactions: None,
        };

        let record = TransactionRecord::from(raw);

        assert_eq!(record.amount(), None);
        assert_eq!(record.absolute_volume(), 0.0);
        assert_eq!(record.truncated_amount(), None);
        assert_eq!(record.date(), None);
        assert_eq!(record.utc_date(), None);
        assert_eq!(record.category(), Category::Uncategorized);
    }

    #[test]
    fn fields_of_the_wrong_type_are_tolerated() {
        let json = r#"{
            "id": "12",
            "amount": true,
            "balance": {"value": 10},
            "readable_date": 1705312800,
            "category": 3,
            "total_transactions": [1, 2]
        }"#;

        let raw: RawTransaction = serde_json::from_str(json).unwrap();

        assert_eq!(raw.amount, Some(RawNumber::Other(serde_json::Value::Bool(true))));
        assert_eq!(raw.readable_date, None);
        assert_eq!(raw.category, None);

        let record = TransactionRecord::from(raw);

        assert_eq!(record.id(), Some(12));
        assert_eq!(record.amount(), None);
        assert_eq!(record.absolute_volume(), 0.0);
        assert_eq!(record.balance(), None);
        assert_eq!(record.date(), None);
        assert_eq!(record.category(), Category::Uncategorized);
    }

    #[test]
    fn missing_fields_are_tolerated() {
        let raw: RawTransaction = serde_json::from_str("{}").unwrap();
        let record = TransactionRecord::from(raw);

        assert_eq!(record.category(), Category::Uncategorized);
        assert_eq!(record.amount(), None);
        assert_eq!(record.id(), None);
    }

    #[test]
    fn truncates_toward_zero_keeping_sign() {
        let record = |amount| TransactionRecord::new(None, Category::Withdrawal, Some(amount));

        assert_eq!(record(-500.75).truncated_amount(), Some(-500));
        assert_eq!(record(1999.99).truncated_amount(), Some(1999));
        assert_eq!(record(-0.5).truncated_amount(), Some(0));
    }

    #[test]
    fn absolute_volume_discards_direction() {
        let debit = TransactionRecord::new(None, Category::Withdrawal, Some(-500.0));
        let credit = TransactionRecord::new(None, Category::IncomingMoney, Some(500.0));

        assert_eq!(debit.absolute_volume(), 500.0);
        assert_eq!(credit.absolute_volume(), 500.0);
    }

    #[test]
    fn non_finite_amounts_are_treated_as_missing() {
        let record = TransactionRecord::new(None, Category::Pack, Some(f64::NAN));
        assert_eq!(record.amount(), None);
        assert_eq!(record.absolute_volume(), 0.0);
    }
}
