//! Manual reordering. Only allowed while the store is unsorted.

use crate::error::{StoreError, StoreResult};
use crate::event::RowEvent;
use crate::iter::RowIter;
use crate::sortable::move_permutation;
use crate::store::RowStore;
use crate::tree_array::NodeId;

impl RowStore {
    /// Permutes the rows: the row at old position `new_order[i]` moves to `i`.
    pub fn reorder(&mut self, new_order: &[usize]) -> StoreResult<()> {
        self.ensure_unsorted()?;
        let len = self.len();
        if !is_permutation(new_order, len) {
            return Err(StoreError::InvalidPermutation { len });
        }
        let ids = self.rows.ids();
        let reordered: Vec<NodeId> = new_order.iter().map(|&index| ids[index]).collect();
        self.rows
            .rebuild(&reordered)
            .map_err(|_| StoreError::InvalidPermutation { len })?;
        self.emit(RowEvent::RowsReordered {
            new_order: new_order.to_vec(),
        });
        Ok(())
    }

    /// Exchanges two rows. Swapping a row with itself does nothing.
    pub fn swap(&mut self, a: RowIter, b: RowIter) -> StoreResult<()> {
        self.ensure_unsorted()?;
        let (first, second) = (self.resolve(a)?, self.resolve(b)?);
        if first == second {
            return Ok(());
        }
        let (pa, pb) = (self.position(a)?, self.position(b)?);
        let mut ids = self.rows.ids();
        ids.swap(pa, pb);
        self.rows
            .rebuild(&ids)
            .map_err(|_| StoreError::InvalidIterator)?;

        let mut new_order: Vec<usize> = (0..ids.len()).collect();
        new_order.swap(pa, pb);
        self.emit(RowEvent::RowsReordered { new_order });
        Ok(())
    }

    /// Moves `iter` right before `position`, or to the end when `position` is `None`.
    pub fn move_before(&mut self, iter: RowIter, position: Option<RowIter>) -> StoreResult<()> {
        self.ensure_unsorted()?;
        let node = self.resolve(iter)?;
        let target = match position {
            Some(position) => self.position(position)?,
            None => self.len(),
        };
        self.move_row(node, target)
    }

    /// Moves `iter` right after `position`, or to the start when `position` is `None`.
    pub fn move_after(&mut self, iter: RowIter, position: Option<RowIter>) -> StoreResult<()> {
        self.ensure_unsorted()?;
        let node = self.resolve(iter)?;
        let target = match position {
            Some(position) => self.position(position)? + 1,
            None => 0,
        };
        self.move_row(node, target)
    }

    fn ensure_unsorted(&self) -> StoreResult<()> {
        if self.is_sorted() {
            Err(StoreError::NotAllowedWhileSorted)
        } else {
            Ok(())
        }
    }

    /// `target` is a gap index in the current order: the row lands before the
    /// row now at `target`.
    fn move_row(&mut self, node: NodeId, target: usize) -> StoreResult<()> {
        let len = self.len();
        let from = self.rows.position(node).ok_or(StoreError::InvalidIterator)?;
        let to = if target > from { target - 1 } else { target };
        let to = to.min(len - 1);
        self.rows
            .move_to(node, to)
            .map_err(|_| StoreError::InvalidIterator)?;
        self.emit(RowEvent::RowsReordered {
            new_order: move_permutation(len, from, to),
        });
        Ok(())
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    order
        .iter()
        .all(|&index| index < len && !std::mem::replace(&mut seen[index], true))
}
