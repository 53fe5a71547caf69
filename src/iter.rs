use std::sync::atomic::{AtomicU64, Ordering};

use crate::tree_array::NodeId;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`RowStore`](crate::RowStore) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    pub(crate) fn next() -> Self {
        StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle addressing one row of a store.
///
/// An iterator is valid while the store it came from has not been cleared
/// and its row has not been removed. Inserting, removing or moving other rows
/// leaves it valid. Validity is always re-checked by the store, so holding a
/// stale iterator is harmless: operations on it fail with
/// [`StoreError::InvalidIterator`](crate::StoreError::InvalidIterator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowIter {
    pub(crate) store: StoreId,
    pub(crate) stamp: u32,
    pub(crate) node: NodeId,
}

impl RowIter {
    /// Returns the generation stamp the iterator was issued under.
    pub fn stamp(&self) -> u32 {
        self.stamp
    }

    /// Returns the store the iterator belongs to.
    pub fn store(&self) -> StoreId {
        self.store
    }
}
