use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::store::RowStore;
use crate::value::{Value, ValueKind};

/// Serializable copy of a store's schema and rows, in row order.
///
/// Sort state, comparators and observers are not part of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub columns: Vec<ValueKind>,
    pub rows: Vec<Vec<Value>>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl RowStore {
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            columns: self.column_types().to_vec(),
            rows: self.iter().map(|(_, row)| row.to_vec()).collect(),
        }
    }

    /// Builds a new store holding the snapshot's rows.
    ///
    /// Cells are converted to their column kinds; any failure rejects the
    /// whole snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot, config: StoreConfig) -> StoreResult<Self> {
        let mut store = RowStore::with_config(snapshot.columns, config)?;
        let expected = store.column_count();
        for (index, row) in snapshot.rows.into_iter().enumerate() {
            if row.len() != expected {
                return Err(StoreError::SnapshotArity {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            let cells = row
                .into_iter()
                .enumerate()
                .map(|(column, value)| store.schema.coerce(column, value))
                .collect::<StoreResult<Vec<Value>>>()?;
            store.rows.append(cells);
        }
        store.columns_dirty = !store.rows.is_empty();
        debug!(store = ?store.id(), rows = store.len(), "restored snapshot");
        Ok(store)
    }
}
