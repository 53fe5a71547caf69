use std::fmt::{self, Write};

use tracing::{debug, warn};

use crate::column::{ColumnSchema, ColumnType};
use crate::config::{ConversionPolicy, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::event::{Observer, ObserverId, Observers, RowEvent};
use crate::iter::{RowIter, StoreId};
use crate::sort::{Comparators, SortState};
use crate::tree_array::{NodeId, TreeArray};
use crate::value::{Value, ValueKind};

/// Ordered collection of fixed-arity rows addressed by stable iterators.
///
/// Rows keep their identity while they move: an iterator obtained for a row
/// keeps addressing that row across inserts, removals, sorts and manual
/// reorders of the other rows, until the row itself is removed or the store
/// is cleared.
#[derive(Debug)]
pub struct RowStore {
    pub(crate) id: StoreId,
    pub(crate) stamp: u32,
    pub(crate) schema: ColumnSchema,
    pub(crate) columns_dirty: bool,
    pub(crate) rows: TreeArray<Vec<Value>>,
    pub(crate) sort: SortState,
    pub(crate) comparators: Comparators,
    pub(crate) observers: Observers,
    pub(crate) config: StoreConfig,
}

impl RowStore {
    /// Creates a store whose rows hold one cell per entry of `kinds`.
    pub fn new(kinds: impl Into<Vec<ValueKind>>) -> StoreResult<Self> {
        Self::with_config(kinds, StoreConfig::default())
    }

    pub fn with_config(kinds: impl Into<Vec<ValueKind>>, config: StoreConfig) -> StoreResult<Self> {
        let schema = ColumnSchema::new(kinds)?;
        let mut store = Self::empty();
        store.schema = schema;
        store.config = config;
        Ok(store)
    }

    /// Creates a store without columns. Declare them once with
    /// [`set_column_types`](Self::set_column_types) before inserting rows.
    pub fn empty() -> Self {
        Self {
            id: StoreId::next(),
            stamp: 1,
            schema: ColumnSchema::default(),
            columns_dirty: false,
            rows: TreeArray::new(),
            sort: SortState::Unsorted,
            comparators: Comparators::default(),
            observers: Observers::default(),
            config: StoreConfig::default(),
        }
    }

    /// Declares the column kinds of a store created with [`empty`](Self::empty).
    ///
    /// # Panics
    ///
    /// Panics if the schema was already declared or a row was ever inserted.
    pub fn set_column_types(&mut self, kinds: impl Into<Vec<ValueKind>>) -> StoreResult<()> {
        assert!(
            self.schema.is_empty() && !self.columns_dirty,
            "column types can only be declared once, before the store is used"
        );
        self.schema = ColumnSchema::new(kinds)?;
        debug!(store = ?self.id, schema = %self.schema, "declared columns");
        Ok(())
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Returns the current generation stamp. It only changes on [`clear`](Self::clear).
    pub fn stamp(&self) -> u32 {
        self.stamp
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn column_type(&self, column: usize) -> Option<ValueKind> {
        self.schema.kind(column)
    }

    pub fn column_types(&self) -> &[ValueKind] {
        self.schema.kinds()
    }

    /// Registers `observer`; it receives every subsequent [`RowEvent`].
    pub fn connect(&mut self, observer: impl Observer + 'static) -> ObserverId {
        self.observers.connect(Box::new(observer))
    }

    /// Removes an observer. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.disconnect(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ------------------ insertion ------------------

    /// Inserts an empty row at `position` and returns its iterator.
    ///
    /// Positions past the end append; `usize::MAX` is the conventional
    /// "append". When the store is sorted the row goes to its sorted position
    /// instead, which is the position reported by `RowInserted`.
    pub fn insert(&mut self, position: usize) -> RowIter {
        let row = self.schema.default_row();
        self.insert_row(position, row)
    }

    pub fn prepend(&mut self) -> RowIter {
        self.insert(0)
    }

    pub fn append(&mut self) -> RowIter {
        self.insert(usize::MAX)
    }

    /// Inserts an empty row before `sibling`.
    ///
    /// Without a sibling, or with one that is not valid for this store, the
    /// row is appended.
    pub fn insert_before(&mut self, sibling: Option<RowIter>) -> RowIter {
        let position = sibling
            .and_then(|sibling| self.position(sibling).ok())
            .unwrap_or_else(|| self.len());
        self.insert(position)
    }

    /// Inserts an empty row after `sibling`.
    ///
    /// Without a sibling, or with one that is not valid for this store, the
    /// row is prepended.
    pub fn insert_after(&mut self, sibling: Option<RowIter>) -> RowIter {
        let position = sibling
            .and_then(|sibling| self.position(sibling).ok())
            .map_or(0, |position| position + 1);
        self.insert(position)
    }

    /// Inserts a row already holding `values`.
    ///
    /// Unlike [`insert`](Self::insert) followed by
    /// [`set_values`](Self::set_values), observers see a single `RowInserted`
    /// for a fully populated row and no `RowChanged`. In a sorted store the
    /// row is placed at its sorted position without a `RowsReordered`.
    pub fn insert_with_values(
        &mut self,
        position: usize,
        values: impl IntoIterator<Item = (usize, Value)>,
    ) -> StoreResult<RowIter> {
        let mut row = self.schema.default_row();
        for (column, value) in self.convert_cells(values)? {
            row[column] = value;
        }
        Ok(self.insert_row(position, row))
    }

    fn insert_row(&mut self, position: usize, row: Vec<Value>) -> RowIter {
        self.columns_dirty = true;
        let node = self.rows.insert(position, row);
        if let Some(active) = self.active_comparator() {
            self.relocate_sorted(node, &active);
        }
        let iter = self.iter_for(node);
        let position = self.rows.position(node).unwrap_or(position);
        self.emit(RowEvent::RowInserted { position, iter });
        iter
    }

    // ------------------ mutation ------------------

    /// Assigns one cell, converting `value` to the column kind if needed.
    pub fn set_value(&mut self, iter: RowIter, column: usize, value: Value) -> StoreResult<()> {
        self.set_values(iter, [(column, value)])
    }

    /// Assigns several cells of one row.
    ///
    /// Every value is converted before anything is written. Observers get one
    /// `RowChanged`, followed by at most one `RowsReordered` if the store is
    /// sorted and the row had to move.
    pub fn set_values(
        &mut self,
        iter: RowIter,
        values: impl IntoIterator<Item = (usize, Value)>,
    ) -> StoreResult<()> {
        let node = self.resolve(iter)?;
        let cells = self.convert_cells(values)?;
        if cells.is_empty() {
            return Ok(());
        }
        let columns: Vec<usize> = cells.iter().map(|(column, _)| *column).collect();
        if let Some(row) = self.rows.get_mut(node) {
            for (column, value) in cells {
                row[column] = value;
            }
        }
        let position = self.position(iter)?;
        self.emit(RowEvent::RowChanged { position, iter });

        // an observer may have removed the row
        if !self.rows.contains(node) {
            return Ok(());
        }
        if let Some(active) = self.active_comparator() {
            if active.depends_on(&columns) {
                self.resort_row(node, &active);
            }
        }
        Ok(())
    }

    /// Removes the row at `iter` and returns the iterator of the row that
    /// followed it, or `None` if it was the last row.
    pub fn remove(&mut self, iter: RowIter) -> StoreResult<Option<RowIter>> {
        let node = self.resolve(iter)?;
        let position = self.position(iter)?;
        let next = self.rows.next(node);
        self.rows.remove(node);
        self.emit(RowEvent::RowDeleted { position });
        Ok(next.map(|next| self.iter_for(next)))
    }

    /// Removes every row, front to back, then invalidates all iterators.
    pub fn clear(&mut self) {
        let removed = self.rows.len();
        while let Some(node) = self.rows.id_at(0) {
            self.rows.remove(node);
            self.emit(RowEvent::RowDeleted { position: 0 });
        }
        self.increment_stamp();
        debug!(store = ?self.id, removed, stamp = self.stamp, "cleared");
    }

    fn increment_stamp(&mut self) {
        loop {
            self.stamp = self.stamp.wrapping_add(1);
            if self.stamp != 0 {
                break;
            }
        }
    }

    // ------------------ traversal ------------------

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The authoritative validity check: same store, same generation, live row.
    pub fn is_valid(&self, iter: RowIter) -> bool {
        iter.store == self.id && iter.stamp == self.stamp && self.rows.contains(iter.node)
    }

    pub fn iter_at(&self, position: usize) -> Option<RowIter> {
        self.rows.id_at(position).map(|node| self.iter_for(node))
    }

    pub fn position(&self, iter: RowIter) -> StoreResult<usize> {
        let node = self.resolve(iter)?;
        self.rows.position(node).ok_or(StoreError::InvalidIterator)
    }

    pub fn first(&self) -> Option<RowIter> {
        self.iter_at(0)
    }

    /// Returns the following row, or `None` past the last row or for a stale `iter`.
    pub fn next(&self, iter: RowIter) -> Option<RowIter> {
        let node = self.resolve(iter).ok()?;
        self.rows.next(node).map(|node| self.iter_for(node))
    }

    pub fn previous(&self, iter: RowIter) -> Option<RowIter> {
        let node = self.resolve(iter).ok()?;
        self.rows.prev(node).map(|node| self.iter_for(node))
    }

    /// Borrows every cell of the row at `iter`.
    pub fn row(&self, iter: RowIter) -> StoreResult<&[Value]> {
        let node = self.resolve(iter)?;
        self.rows
            .get(node)
            .map(Vec::as_slice)
            .ok_or(StoreError::InvalidIterator)
    }

    pub fn get_value(&self, iter: RowIter, column: usize) -> StoreResult<Value> {
        let row = self.row(iter)?;
        row.get(column)
            .cloned()
            .ok_or_else(|| StoreError::column_out_of_range(column, self.column_count()))
    }

    /// Reads a cell as a Rust type.
    pub fn get<T: ColumnType>(&self, iter: RowIter, column: usize) -> StoreResult<T> {
        let value = self.get_value(iter, column)?;
        T::try_from(value).map_err(|value| StoreError::type_mismatch(column, T::KIND, value.kind()))
    }

    /// Iterates over the rows in order.
    pub fn iter(&self) -> impl Iterator<Item = (RowIter, &[Value])> + '_ {
        self.rows
            .iter()
            .map(move |(node, row)| (self.iter_for(node), row.as_slice()))
    }

    /// Renders the store into a padded textual table.
    pub fn render(&self) -> String {
        if self.column_count() == 0 {
            return "(no columns)".to_string();
        }
        let headers: Vec<String> = self
            .column_types()
            .iter()
            .enumerate()
            .map(|(index, kind)| format!("{}:{}", index, kind))
            .collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|(_, row)| row.iter().map(ToString::to_string).collect())
            .collect();
        let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut output = String::new();
        for (index, (header, width)) in headers.iter().zip(&widths).enumerate() {
            if index > 0 {
                output.push(' ');
            }
            let _ = write!(output, "{:<width$}", header, width = width);
        }
        output.push('\n');
        for (index, width) in widths.iter().enumerate() {
            if index > 0 {
                output.push(' ');
            }
            output.push_str(&"-".repeat(*width));
        }
        for row in &cells {
            output.push('\n');
            for (index, (cell, width)) in row.iter().zip(&widths).enumerate() {
                if index > 0 {
                    output.push(' ');
                }
                let _ = write!(output, "{:<width$}", cell, width = width);
            }
        }
        output
    }

    // ------------------ internals ------------------

    pub(crate) fn resolve(&self, iter: RowIter) -> StoreResult<NodeId> {
        if self.is_valid(iter) {
            Ok(iter.node)
        } else {
            Err(StoreError::InvalidIterator)
        }
    }

    pub(crate) fn iter_for(&self, node: NodeId) -> RowIter {
        RowIter {
            store: self.id,
            stamp: self.stamp,
            node,
        }
    }

    /// Delivers `event` to every observer. Called from inside a notification,
    /// it only queues the event behind the one being delivered.
    pub(crate) fn emit(&mut self, event: RowEvent) {
        if !self.observers.enqueue(event) {
            return;
        }
        while let Some((event, limit)) = self.observers.next_event() {
            let mut index = 0;
            while let Some((id, mut observer)) = self.observers.take(index, limit) {
                observer.notify(self, &event);
                index = self.observers.restore(id, observer);
            }
        }
    }

    /// Converts a batch of cell assignments according to the conversion policy.
    pub(crate) fn convert_cells(
        &self,
        values: impl IntoIterator<Item = (usize, Value)>,
    ) -> StoreResult<Vec<(usize, Value)>> {
        let mut cells = Vec::new();
        for (column, value) in values {
            match self.schema.coerce(column, value) {
                Ok(value) => cells.push((column, value)),
                Err(StoreError::TypeMismatch {
                    column,
                    expected,
                    found,
                }) if self.config.conversion == ConversionPolicy::Lenient => {
                    warn!(column, %expected, %found, "skipping unconvertible cell");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(cells)
    }
}

impl fmt::Display for RowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
