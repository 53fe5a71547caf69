mod common;

use common::{record, string_int_store, strings};
use rowstore::{RowEvent, SortColumn, SortOrder, StoreError, StoreResult};

#[test]
fn reorder_applies_the_permutation() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 0), ("b", 1), ("c", 2), ("d", 3)])?;
    let b = store.iter_at(1).expect("rows");
    let events = record(&mut store);

    store.reorder(&[3, 1, 0, 2])?;
    assert_eq!(strings(&store), vec!["d", "b", "a", "c"]);
    assert_eq!(store.position(b)?, 1);
    assert_eq!(
        *events.borrow(),
        vec![RowEvent::RowsReordered {
            new_order: vec![3, 1, 0, 2]
        }]
    );
    Ok(())
}

#[test]
fn reorder_then_inverse_restores_the_order() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 0), ("b", 1), ("c", 2), ("d", 3), ("e", 4)])?;
    let before = strings(&store);
    let order = [4, 0, 3, 1, 2];
    let mut inverse = [0; 5];
    for (new, old) in order.iter().enumerate() {
        inverse[*old] = new;
    }
    store.reorder(&order)?;
    store.reorder(&inverse)?;
    assert_eq!(strings(&store), before);
    Ok(())
}

#[test]
fn reorder_rejects_non_permutations() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 0), ("b", 1), ("c", 2)])?;
    let events = record(&mut store);
    let bad: [&[usize]; 3] = [&[0, 1], &[0, 0, 1], &[0, 1, 3]];
    for order in bad {
        assert!(matches!(
            store.reorder(order),
            Err(StoreError::InvalidPermutation { len: 3 })
        ));
    }
    assert_eq!(strings(&store), vec!["a", "b", "c"]);
    assert!(events.borrow().is_empty());
    Ok(())
}

#[test]
fn manual_moves_are_refused_while_sorted() -> StoreResult<()> {
    let mut store = string_int_store(&[("b", 1), ("a", 0)])?;
    store.set_sort_column(SortColumn::Column(0), SortOrder::Ascending)?;
    let events = record(&mut store);
    let (first, last) = (store.first().expect("rows"), store.iter_at(1).expect("rows"));

    assert!(matches!(
        store.reorder(&[1, 0]),
        Err(StoreError::NotAllowedWhileSorted)
    ));
    assert!(matches!(
        store.swap(first, last),
        Err(StoreError::NotAllowedWhileSorted)
    ));
    assert!(matches!(
        store.move_before(last, Some(first)),
        Err(StoreError::NotAllowedWhileSorted)
    ));
    assert!(matches!(
        store.move_after(first, None),
        Err(StoreError::NotAllowedWhileSorted)
    ));
    assert_eq!(strings(&store), vec!["a", "b"]);
    assert!(events.borrow().is_empty());
    Ok(())
}

#[test]
fn swap_exchanges_two_rows() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 0), ("b", 1), ("c", 2), ("d", 3)])?;
    let a = store.iter_at(0).expect("rows");
    let c = store.iter_at(2).expect("rows");
    let events = record(&mut store);

    store.swap(a, c)?;
    assert_eq!(strings(&store), vec!["c", "b", "a", "d"]);
    assert_eq!(store.position(a)?, 2);
    assert_eq!(
        *events.borrow(),
        vec![RowEvent::RowsReordered {
            new_order: vec![2, 1, 0, 3]
        }]
    );

    store.swap(a, a)?;
    assert_eq!(events.borrow().len(), 1);
    Ok(())
}

#[test]
fn move_before_and_after() -> StoreResult<()> {
    let mut store = string_int_store(&[("a", 0), ("b", 1), ("c", 2), ("d", 3)])?;
    let a = store.iter_at(0).expect("rows");
    let c = store.iter_at(2).expect("rows");
    let d = store.iter_at(3).expect("rows");
    let events = record(&mut store);

    store.move_before(a, Some(d))?;
    assert_eq!(strings(&store), vec!["b", "c", "a", "d"]);

    store.move_after(d, None)?;
    assert_eq!(strings(&store), vec!["d", "b", "c", "a"]);

    store.move_before(d, None)?;
    assert_eq!(strings(&store), vec!["b", "c", "a", "d"]);

    store.move_after(a, Some(c))?;
    assert_eq!(strings(&store), vec!["b", "c", "a", "d"]);

    let orders: Vec<Vec<usize>> = events
        .borrow()
        .iter()
        .map(|event| match event {
            RowEvent::RowsReordered { new_order } => new_order.clone(),
            other => panic!("unexpected event {:?}", other),
        })
        .collect();
    assert_eq!(
        orders,
        vec![
            vec![1, 2, 0, 3],
            vec![3, 0, 1, 2],
            vec![1, 2, 3, 0],
            vec![0, 1, 2, 3],
        ]
    );
    Ok(())
}
