mod common;

use common::{names, record, string_int_store, strings};
use rowstore::{
    DragDest, DragSource, DropTarget, RowEvent, SortColumn, SortOrder, StoreResult, Value,
};

#[test]
fn dropping_copies_the_row() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 1), ("b", 2), ("c", 3)])?;
    let data = store.drag_data_get(0).expect("row 0");
    assert!(store.row_draggable(0));
    assert!(store.row_drop_possible(3, &data));
    let events = record(&mut store);

    assert!(store.drag_data_received(3, &data)?);
    assert_eq!(strings(&store), vec!["a", "b", "c", "a"]);
    let copy = store.iter_at(3).expect("copied row");
    assert_eq!(store.row(copy)?, &[Value::Str("a".into()), Value::Int(1)][..]);
    assert_eq!(
        *events.borrow(),
        vec![
            RowEvent::RowInserted { position: 3, iter: copy },
            RowEvent::RowChanged { position: 3, iter: copy },
        ]
    );
    Ok(())
}

#[test]
fn drag_move_relocates_the_row() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 1), ("b", 2), ("c", 3)])?;
    let events = record(&mut store);

    assert!(store.drag_move(DropTarget { source: 0, dest: 3 })?);
    assert_eq!(strings(&store), vec!["b", "c", "a"]);
    assert_eq!(names(&events), vec!["row-inserted", "row-changed", "row-deleted"]);

    assert!(store.drag_move(DropTarget { source: 2, dest: 0 })?);
    assert_eq!(strings(&store), vec!["a", "b", "c"]);
    Ok(())
}

#[test]
fn drops_are_refused_when_they_can_not_apply() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 1), ("b", 2)])?;
    let mut other = string_int_store(&[("x", 9)])?;
    let foreign = other.drag_data_get(0).expect("row 0");

    assert!(!store.row_drop_possible(0, &foreign));
    assert!(!store.drag_data_received(0, &foreign)?);

    let data = store.drag_data_get(1).expect("row 1");
    assert!(!store.row_drop_possible(3, &data));
    assert!(store.drag_data_get(5).is_none());
    assert!(!store.drag_data_delete(5));

    store.set_sort_column(SortColumn::Column(0), SortOrder::Ascending)?;
    assert!(!store.row_drop_possible(0, &data));
    assert!(!store.drag_move(DropTarget { source: 1, dest: 0 })?);
    assert_eq!(strings(&store), vec!["a", "b"]);

    assert!(other.drag_data_delete(0));
    assert!(!other.drag_data_received(0, &foreign)?);
    assert!(other.is_empty());
    Ok(())
}

#[test]
fn drop_targets_serialize_as_positions() -> StoreResult<()> {
    let target: DropTarget = serde_json::from_str(r#"{"source": 4, "dest": 1}"#)?;
    assert_eq!(target, DropTarget { source: 4, dest: 1 });
    Ok(())
}
