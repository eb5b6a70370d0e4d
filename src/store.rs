//! Holds the full, unfiltered list of transactions fetched from the data source.

use crate::{source::TransactionSnapshot, transaction::TransactionRecord};

/// The single source of truth for every dashboard view.
///
/// Loading replaces the held records wholesale, there is no incremental merge.
/// Records are only ever handed out by shared reference.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    records: Vec<TransactionRecord>,
    total_transactions: Option<f64>,
}

impl TransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held records with `records`.
    pub fn load(&mut self, records: Vec<TransactionRecord>) {
        tracing::debug!(
            "replacing {} stored transactions with {}",
            self.records.len(),
            records.len()
        );
        self.records = records;
    }

    /// Replace the held records and the summary total with the contents of `snapshot`.
    pub fn load_snapshot(&mut self, snapshot: TransactionSnapshot) {
        self.load(snapshot.records);
        self.total_transactions = snapshot.total_transactions;
    }

    /// All held records in the order the data source returned them.
    pub fn all(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// The pre-aggregated total reported by the data source, if any.
    pub fn total_transactions(&self) -> Option<f64> {
        self.total_transactions
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        category::Category, source::TransactionSnapshot, transaction::TransactionRecord,
    };

    use super::TransactionStore;

    fn record(amount: f64) -> TransactionRecord {
        TransactionRecord::new(
            Some(datetime!(2024-01-15 10:00 UTC)),
            Category::IncomingMoney,
            Some(amount),
        )
    }

    #[test]
    fn new_store_is_empty() {
        let store = TransactionStore::new();

        assert!(store.is_empty());
        assert!(store.all().is_empty());
        assert_eq!(store.total_transactions(), None);
    }

    #[test]
    fn load_replaces_records_wholesale() {
        let mut store = TransactionStore::new();
        store.load(vec![record(1.0), record(2.0)]);
        store.load(vec![record(3.0)]);

        assert_eq!(store.all(), &[record(3.0)]);
    }

    #[test]
    fn load_preserves_order() {
        let records = vec![record(3.0), record(1.0), record(2.0)];
        let mut store = TransactionStore::new();
        store.load(records.clone());

        assert_eq!(store.all(), records.as_slice());
    }

    #[test]
    fn load_snapshot_sets_total() {
        let mut store = TransactionStore::new();
        store.load_snapshot(TransactionSnapshot {
            records: vec![record(1.0)],
            total_transactions: Some(1.0),
        });

        assert_eq!(store.all().len(), 1);
        assert_eq!(store.total_transactions(), Some(1.0));
    }
}
