//! Ordered in-memory row store.
//!
//! This crate provides:
//! - [`RowStore`]: fixed-arity rows of typed cells, addressed by stable [`RowIter`]s,
//!   optionally kept sorted by a column or a pluggable [`RowComparator`].
//! - [`RowEvent`] notifications delivered synchronously to connected [`Observer`]s.
//! - [`TreeArray`]: the arena-backed implicit AVL tree underneath, with `O(log n)`
//!   access by index and by handle.
//! - [`Value`]: the dynamic cell representation, with conversions between kinds.
//!
//! ```
//! use rowstore::{RowStore, SortColumn, SortOrder, StoreResult, ValueKind};
//!
//! # fn main() -> StoreResult<()> {
//! let mut store = RowStore::new(vec![ValueKind::Str, ValueKind::Int])?;
//! for (name, rank) in [("c", 3), ("a", 1), ("b", 2)] {
//!     store.insert_with_values(usize::MAX, [(0, name.into()), (1, rank.into())])?;
//! }
//! store.set_sort_column(SortColumn::Column(0), SortOrder::Ascending)?;
//! let first = store.first().expect("store has rows");
//! assert_eq!(store.get::<i32>(first, 1)?, 1);
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod config;
pub mod dnd;
pub mod error;
pub mod event;
pub mod iter;
mod reorder;
pub mod snapshot;
pub mod sort;
mod sortable;
pub mod store;
pub mod tree_array;
pub mod value;

pub use column::{ColumnSchema, ColumnType};
pub use config::{ConversionPolicy, StoreConfig};
pub use dnd::{DragDest, DragSource, DropTarget, RowDragData};
pub use error::{StoreError, StoreResult};
pub use event::{Observer, ObserverId, RowEvent};
pub use iter::{RowIter, StoreId};
pub use snapshot::StoreSnapshot;
pub use sort::{ColumnComparator, RowComparator, SortColumn, SortOrder, SortState};
pub use store::RowStore;
pub use tree_array::{IndexError, IndexResult, NodeId, TreeArray, TreeArrayIter};
pub use value::{Value, ValueKind};
