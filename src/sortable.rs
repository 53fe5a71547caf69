//! Sort state transitions and the sort passes that keep a sorted store in order.

use std::cmp::Ordering;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{StoreError, StoreResult};
use crate::event::RowEvent;
use crate::sort::{ActiveComparator, RowComparator, SortColumn, SortOrder, SortState};
use crate::store::RowStore;
use crate::tree_array::NodeId;

impl RowStore {
    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn is_sorted(&self) -> bool {
        self.sort.is_sorted()
    }

    /// Returns the sort id and order when sorted by a concrete sort id.
    ///
    /// `None` both when unsorted and when sorted by the default comparator.
    pub fn sort_column(&self) -> Option<(usize, SortOrder)> {
        match self.sort {
            SortState::Column(id, order) => Some((id, order)),
            _ => None,
        }
    }

    /// Switches the sort discipline.
    ///
    /// Requesting the current column and order again does nothing. Otherwise
    /// observers get `SortColumnChanged` and, unless the store becomes
    /// unsorted, the rows are fully re-sorted.
    pub fn set_sort_column(&mut self, column: SortColumn, order: SortOrder) -> StoreResult<()> {
        let state = match column {
            SortColumn::Unsorted => SortState::Unsorted,
            SortColumn::Default => SortState::Default(order),
            SortColumn::Column(id) => SortState::Column(id, order),
        };
        if state == self.sort {
            return Ok(());
        }
        if !self.comparators.supports(column, &self.schema) {
            return Err(StoreError::no_comparator(column));
        }
        debug!(store = ?self.id, from = ?self.sort, to = ?state, "sort column changed");
        self.sort = state;
        self.emit(RowEvent::SortColumnChanged);
        self.sort_rows();
        Ok(())
    }

    /// Registers the comparator used for `sort_id`, replacing the built-in one.
    ///
    /// Sort ids are not limited to column indices. If `sort_id` is the active
    /// sort id the rows are re-sorted right away.
    pub fn set_sort_func(&mut self, sort_id: usize, comparator: impl RowComparator + 'static) {
        self.comparators.set(sort_id, Rc::new(comparator));
        if matches!(self.sort, SortState::Column(id, _) if id == sort_id) {
            self.sort_rows();
        }
    }

    /// Installs the comparator used by [`SortColumn::Default`].
    pub fn set_default_sort_func(&mut self, comparator: impl RowComparator + 'static) {
        self.comparators.set_default(Some(Rc::new(comparator)));
        if matches!(self.sort, SortState::Default(_)) {
            self.sort_rows();
        }
    }

    /// Drops the default comparator. A store sorted by it becomes unsorted.
    pub fn unset_default_sort_func(&mut self) {
        self.comparators.set_default(None);
        if matches!(self.sort, SortState::Default(_)) {
            self.sort = SortState::Unsorted;
            self.emit(RowEvent::SortColumnChanged);
        }
    }

    pub fn has_default_sort_func(&self) -> bool {
        self.comparators.has_default()
    }

    pub(crate) fn active_comparator(&self) -> Option<ActiveComparator> {
        self.comparators.resolve(self.sort, &self.schema)
    }

    /// Stable full sort with the active comparator.
    fn sort_rows(&mut self) {
        let Some(active) = self.active_comparator() else {
            return;
        };
        let len = self.len();
        if len <= 1 {
            return;
        }
        let ids = self.rows.ids();
        let mut new_order: Vec<usize> = (0..len).collect();
        new_order.sort_by(|&a, &b| {
            active.compare(self, self.iter_for(ids[a]), self.iter_for(ids[b]))
        });
        let sorted: Vec<NodeId> = new_order.iter().map(|&index| ids[index]).collect();
        if self.rows.rebuild(&sorted).is_ok() {
            debug!(store = ?self.id, rows = len, state = ?self.sort, "sorted");
            self.emit(RowEvent::RowsReordered { new_order });
        }
    }

    /// Re-sorts a single row after its cells changed. A row that is still in
    /// order relative to its neighbours stays where it is.
    pub(crate) fn resort_row(&mut self, node: NodeId, active: &ActiveComparator) {
        if self.is_in_order(node, active) {
            return;
        }
        let len = self.len();
        if let Some((from, to)) = self.relocate_sorted(node, active) {
            self.emit(RowEvent::RowsReordered {
                new_order: move_permutation(len, from, to),
            });
        }
    }

    /// Moves `node` after the last row that does not sort after it, assuming
    /// every other row is in order. Returns the old and new positions if it
    /// moved.
    pub(crate) fn relocate_sorted(
        &mut self,
        node: NodeId,
        active: &ActiveComparator,
    ) -> Option<(usize, usize)> {
        let from = self.rows.position(node)?;
        let iter = self.iter_for(node);

        // upper bound among the other rows, so equal rows keep the moved row last
        let others = self.len() - 1;
        let (mut low, mut high) = (0, others);
        while low < high {
            let mid = low + (high - low) / 2;
            let index = if mid < from { mid } else { mid + 1 };
            let other = self.iter_at(index)?;
            if active.compare(self, iter, other) == Ordering::Less {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        if low == from {
            return None;
        }
        self.rows.move_to(node, low).ok()?;
        trace!(store = ?self.id, from, to = low, "relocated row");
        Some((from, low))
    }

    fn is_in_order(&self, node: NodeId, active: &ActiveComparator) -> bool {
        let iter = self.iter_for(node);
        let before = self.rows.prev(node).map(|prev| self.iter_for(prev));
        let after = self.rows.next(node).map(|next| self.iter_for(next));
        let prev_ok = before.map_or(true, |prev| {
            active.compare(self, prev, iter) != Ordering::Greater
        });
        let next_ok = after.map_or(true, |next| {
            active.compare(self, iter, next) != Ordering::Greater
        });
        prev_ok && next_ok
    }
}

/// Permutation produced by taking the row at `from` out and reinserting it
/// at `to`. `new_order[i]` is the old position of the row now at `i`.
pub(crate) fn move_permutation(len: usize, from: usize, to: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    let moved = order.remove(from);
    order.insert(to, moved);
    order
}

#[cfg(test)]
mod tests {
    use super::move_permutation;

    #[test]
    fn move_permutation_maps_new_to_old() {
        assert_eq!(move_permutation(4, 0, 3), vec![1, 2, 3, 0]);
        assert_eq!(move_permutation(4, 3, 0), vec![3, 0, 1, 2]);
        assert_eq!(move_permutation(3, 1, 1), vec![0, 1, 2]);
    }
}
