//! Drag and drop of rows within a single store.
//!
//! A drag picks up a row by position; dropping it copies the row's cells into
//! a new row at the destination gap. Moving is done by the caller deleting
//! the source afterwards with [`DragSource::drag_data_delete`].

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::iter::{RowIter, StoreId};
use crate::store::RowStore;

/// Payload describing a dragged row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowDragData {
    pub store: StoreId,
    pub row: RowIter,
}

/// Drop location and source row as plain positions, for callers that carry
/// the payload across their own transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub source: usize,
    pub dest: usize,
}

pub trait DragSource {
    /// Returns whether the row at `position` may be dragged.
    fn row_draggable(&self, position: usize) -> bool;

    /// Captures the row at `position`, if any.
    fn drag_data_get(&self, position: usize) -> Option<RowDragData>;

    /// Deletes the row at `position` once a move completed.
    fn drag_data_delete(&mut self, position: usize) -> bool;
}

pub trait DragDest {
    /// Returns whether `data` could be dropped before position `dest`.
    fn row_drop_possible(&self, dest: usize, data: &RowDragData) -> bool;

    /// Copies the dragged row into a new row before position `dest`.
    ///
    /// Returns `Ok(false)` when the payload is foreign or its row is gone.
    fn drag_data_received(&mut self, dest: usize, data: &RowDragData) -> StoreResult<bool>;
}

impl DragSource for RowStore {
    fn row_draggable(&self, _position: usize) -> bool {
        true
    }

    fn drag_data_get(&self, position: usize) -> Option<RowDragData> {
        self.iter_at(position).map(|row| RowDragData {
            store: self.id(),
            row,
        })
    }

    fn drag_data_delete(&mut self, position: usize) -> bool {
        match self.iter_at(position) {
            Some(iter) => self.remove(iter).is_ok(),
            None => false,
        }
    }
}

impl DragDest for RowStore {
    fn row_drop_possible(&self, dest: usize, data: &RowDragData) -> bool {
        !self.is_sorted() && data.store == self.id() && dest <= self.len()
    }

    fn drag_data_received(&mut self, dest: usize, data: &RowDragData) -> StoreResult<bool> {
        if data.store != self.id() {
            return Ok(false);
        }
        let cells = match self.row(data.row) {
            Ok(row) => row.to_vec(),
            Err(_) => return Ok(false),
        };
        let iter = if dest == 0 {
            self.prepend()
        } else {
            match self.iter_at(dest - 1) {
                Some(prev) => self.insert_after(Some(prev)),
                None => return Ok(false),
            }
        };
        if !self.is_valid(iter) {
            return Ok(false);
        }
        self.set_values(iter, cells.into_iter().enumerate())?;
        Ok(true)
    }
}

impl RowStore {
    /// Performs a complete move: copy `target.source` before `target.dest`,
    /// then delete the original.
    pub fn drag_move(&mut self, target: DropTarget) -> StoreResult<bool> {
        let Some(data) = self.drag_data_get(target.source) else {
            return Ok(false);
        };
        if !self.row_drop_possible(target.dest, &data) {
            return Ok(false);
        }
        if !self.drag_data_received(target.dest, &data)? {
            return Ok(false);
        }
        match self.position(data.row) {
            Ok(source) => Ok(self.drag_data_delete(source)),
            Err(_) => Ok(false),
        }
    }
}
