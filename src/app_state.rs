//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::{source::DataSource, store::TransactionStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The transactions every dashboard view is derived from.
    pub store: Arc<Mutex<TransactionStore>>,
}

impl AppState {
    /// Create a new [AppState] serving the transactions in `store`.
    pub fn new(store: TransactionStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Create a new [AppState] with the transactions fetched from `source`.
    ///
    /// If the fetch fails the error is logged and the dashboard starts with an
    /// empty store. The fetch is not retried.
    pub async fn from_source(source: &impl DataSource) -> Self {
        let mut store = TransactionStore::new();

        match source.fetch().await {
            Ok(snapshot) => {
                tracing::info!("Loaded {} transactions", snapshot.records.len());
                store.load_snapshot(snapshot);
            }
            Err(error) => {
                tracing::error!("Could not load transactions, starting with no data: {error}");
            }
        }

        Self::new(store)
    }
}
