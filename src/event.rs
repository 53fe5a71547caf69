//! Change notifications.
//!
//! Every mutation of a [`RowStore`] is reported synchronously, before the
//! mutating call returns, to each connected [`Observer`] in connection order.
//!
//! Observers may mutate the store they are notified by. Events raised that
//! way are queued and delivered after every observer has seen the current
//! one, so each observer sees events in the order they happened.

use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

use crate::iter::RowIter;
use crate::store::RowStore;

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    /// A row now sits at `position`.
    RowInserted { position: usize, iter: RowIter },
    /// One or more cells of the row at `position` were assigned.
    RowChanged { position: usize, iter: RowIter },
    /// The row that was at `position` is gone.
    RowDeleted { position: usize },
    /// Rows were permuted: `new_order[i]` is the previous position of the row
    /// now at position `i`.
    RowsReordered { new_order: Vec<usize> },
    SortColumnChanged,
}

impl RowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RowEvent::RowInserted { .. } => "row-inserted",
            RowEvent::RowChanged { .. } => "row-changed",
            RowEvent::RowDeleted { .. } => "row-deleted",
            RowEvent::RowsReordered { .. } => "rows-reordered",
            RowEvent::SortColumnChanged => "sort-column-changed",
        }
    }
}

/// Receiver of [`RowEvent`]s.
///
/// Observers see the store in its post-mutation state and may mutate it.
/// Iterators captured before such a nested mutation may be invalidated by
/// it. Any closure `FnMut(&mut RowStore, &RowEvent)` is an observer.
pub trait Observer {
    fn notify(&mut self, store: &mut RowStore, event: &RowEvent);
}

impl<F> Observer for F
where
    F: FnMut(&mut RowStore, &RowEvent),
{
    fn notify(&mut self, store: &mut RowStore, event: &RowEvent) {
        self(store, event)
    }
}

/// Token returned by [`RowStore::connect`], used to disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

struct Entry {
    id: ObserverId,
    /// `None` while the observer is being notified.
    observer: Option<Box<dyn Observer>>,
}

/// Connected observers in connection order, plus the queue of events still
/// to be delivered.
#[derive(Default)]
pub(crate) struct Observers {
    entries: Vec<Entry>,
    next_id: u64,
    pending: VecDeque<RowEvent>,
    delivering: bool,
}

impl Observers {
    pub(crate) fn connect(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            observer: Some(observer),
        });
        id
    }

    pub(crate) fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Queues `event`. Returns `true` when the caller has to drain the queue,
    /// `false` when a delivery further up the stack will pick it up.
    pub(crate) fn enqueue(&mut self, event: RowEvent) -> bool {
        self.pending.push_back(event);
        !std::mem::replace(&mut self.delivering, true)
    }

    /// Pops the next event to deliver, ending the delivery when none is left.
    pub(crate) fn next_event(&mut self) -> Option<(RowEvent, ObserverId)> {
        match self.pending.pop_front() {
            Some(event) => {
                trace!(event = event.name(), observers = self.entries.len(), "dispatching");
                Some((event, ObserverId(self.next_id)))
            }
            None => {
                self.delivering = false;
                None
            }
        }
    }

    /// Lends out the first observer at or after `index` that was connected
    /// before `limit`.
    pub(crate) fn take(
        &mut self,
        index: usize,
        limit: ObserverId,
    ) -> Option<(ObserverId, Box<dyn Observer>)> {
        self.entries
            .iter_mut()
            .skip(index)
            .take_while(|entry| entry.id < limit)
            .find_map(|entry| entry.observer.take().map(|observer| (entry.id, observer)))
    }

    /// Returns a lent observer. It is dropped if it was disconnected in the
    /// meantime. Returns the index to resume delivery from.
    pub(crate) fn restore(&mut self, id: ObserverId, observer: Box<dyn Observer>) -> usize {
        if let Ok(index) = self.entries.binary_search_by_key(&id, |entry| entry.id) {
            self.entries[index].observer = Some(observer);
        }
        self.entries.partition_point(|entry| entry.id <= id)
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("connected", &self.entries.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
