use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::column::ColumnSchema;
use crate::iter::RowIter;
use crate::store::RowStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Sort id requested through [`RowStore::set_sort_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Unsorted,
    /// The store-wide comparator installed with
    /// [`RowStore::set_default_sort_func`].
    Default,
    /// A sort id: a column index or any id a comparator was registered for.
    Column(usize),
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortColumn::Unsorted => f.write_str("unsorted"),
            SortColumn::Default => f.write_str("default"),
            SortColumn::Column(id) => write!(f, "{}", id),
        }
    }
}

/// Current sort discipline of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortState {
    #[default]
    Unsorted,
    Default(SortOrder),
    Column(usize, SortOrder),
}

impl SortState {
    pub fn is_sorted(self) -> bool {
        self != SortState::Unsorted
    }

    pub fn column(self) -> SortColumn {
        match self {
            SortState::Unsorted => SortColumn::Unsorted,
            SortState::Default(_) => SortColumn::Default,
            SortState::Column(id, _) => SortColumn::Column(id),
        }
    }

    pub fn order(self) -> SortOrder {
        match self {
            SortState::Unsorted => SortOrder::Ascending,
            SortState::Default(order) | SortState::Column(_, order) => order,
        }
    }
}

/// Ordering strategy over two rows of the same store.
///
/// Implementations read cells through `store`; both iterators are valid.
/// Any `Fn(&RowStore, RowIter, RowIter) -> Ordering` is a comparator.
pub trait RowComparator {
    fn compare(&self, store: &RowStore, a: RowIter, b: RowIter) -> Ordering;
}

impl<F> RowComparator for F
where
    F: Fn(&RowStore, RowIter, RowIter) -> Ordering,
{
    fn compare(&self, store: &RowStore, a: RowIter, b: RowIter) -> Ordering {
        self(store, a, b)
    }
}

/// Built-in comparator ordering rows by one column's natural order.
#[derive(Debug, Clone, Copy)]
pub struct ColumnComparator {
    column: usize,
}

impl ColumnComparator {
    pub fn new(column: usize) -> Self {
        Self { column }
    }
}

impl RowComparator for ColumnComparator {
    fn compare(&self, store: &RowStore, a: RowIter, b: RowIter) -> Ordering {
        let cell = |iter: RowIter| store.row(iter).ok().and_then(|row| row.get(self.column));
        match (cell(a), cell(b)) {
            (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        }
    }
}

/// Comparator selected for the active sort state.
#[derive(Clone)]
pub(crate) struct ActiveComparator {
    comparator: Rc<dyn RowComparator>,
    order: SortOrder,
    /// Set when the comparator is the built-in one for this column.
    builtin_column: Option<usize>,
}

impl ActiveComparator {
    pub(crate) fn compare(&self, store: &RowStore, a: RowIter, b: RowIter) -> Ordering {
        self.order.apply(self.comparator.compare(store, a, b))
    }

    /// Returns `false` when assigning `columns` can not change the row's rank.
    pub(crate) fn depends_on(&self, columns: &[usize]) -> bool {
        match self.builtin_column {
            Some(sort_column) => columns.contains(&sort_column),
            None => true,
        }
    }
}

/// Registered comparators, keyed by sort id, plus the default one.
#[derive(Default)]
pub(crate) struct Comparators {
    by_id: HashMap<usize, Rc<dyn RowComparator>>,
    default: Option<Rc<dyn RowComparator>>,
}

impl Comparators {
    pub(crate) fn set(&mut self, sort_id: usize, comparator: Rc<dyn RowComparator>) {
        self.by_id.insert(sort_id, comparator);
    }

    pub(crate) fn set_default(&mut self, comparator: Option<Rc<dyn RowComparator>>) {
        self.default = comparator;
    }

    pub(crate) fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Returns `true` when `column` can be sorted on.
    pub(crate) fn supports(&self, column: SortColumn, schema: &ColumnSchema) -> bool {
        match column {
            SortColumn::Unsorted => true,
            SortColumn::Default => self.default.is_some(),
            SortColumn::Column(id) => {
                self.by_id.contains_key(&id)
                    || schema.kind(id).map_or(false, |kind| kind.is_ordered())
            }
        }
    }

    pub(crate) fn resolve(
        &self,
        state: SortState,
        schema: &ColumnSchema,
    ) -> Option<ActiveComparator> {
        match state {
            SortState::Unsorted => None,
            SortState::Default(order) => self.default.clone().map(|comparator| ActiveComparator {
                comparator,
                order,
                builtin_column: None,
            }),
            SortState::Column(id, order) => {
                if let Some(comparator) = self.by_id.get(&id) {
                    return Some(ActiveComparator {
                        comparator: Rc::clone(comparator),
                        order,
                        builtin_column: None,
                    });
                }
                schema
                    .kind(id)
                    .filter(|kind| kind.is_ordered())
                    .map(|_| ActiveComparator {
                        comparator: Rc::new(ColumnComparator::new(id)),
                        order,
                        builtin_column: Some(id),
                    })
            }
        }
    }
}

impl fmt::Debug for Comparators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&usize> = self.by_id.keys().collect();
        ids.sort();
        f.debug_struct("Comparators")
            .field("sort_ids", &ids)
            .field("default", &self.default.is_some())
            .finish()
    }
}
