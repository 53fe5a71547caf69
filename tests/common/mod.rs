#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rowstore::{RowEvent, RowStore, StoreResult, Value, ValueKind};

/// Connects an observer that records every event.
pub fn record(store: &mut RowStore) -> Rc<RefCell<Vec<RowEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    store.connect(move |_: &mut RowStore, event: &RowEvent| sink.borrow_mut().push(event.clone()));
    events
}

pub fn names(events: &RefCell<Vec<RowEvent>>) -> Vec<&'static str> {
    events.borrow().iter().map(RowEvent::name).collect()
}

/// `[string, int]` store filled with `rows`, in order.
pub fn string_int_store(rows: &[(&str, i32)]) -> StoreResult<RowStore> {
    let mut store = RowStore::new(vec![ValueKind::Str, ValueKind::Int])?;
    for (name, number) in rows {
        store.insert_with_values(usize::MAX, [(0, (*name).into()), (1, (*number).into())])?;
    }
    Ok(store)
}

/// Reads column 0 of every row, in order.
pub fn column0(store: &RowStore) -> Vec<Value> {
    store.iter().map(|(_, row)| row[0].clone()).collect()
}

pub fn strings(store: &RowStore) -> Vec<String> {
    store.iter().map(|(_, row)| row[0].to_string()).collect()
}
