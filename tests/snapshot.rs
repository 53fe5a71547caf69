mod common;

use common::{record, string_int_store, strings};
use rowstore::{
    ConversionPolicy, RowStore, SortColumn, SortOrder, StoreConfig, StoreError, StoreResult,
    StoreSnapshot, Value, ValueKind,
};

#[test]
fn snapshot_restores_rows_in_order() -> StoreResult<()> {
    let mut store = string_int_store(&[("b", 2), ("a", 1), ("c", 3)])?;
    store.set_sort_column(SortColumn::Column(0), SortOrder::Ascending)?;

    let json = store.snapshot().to_json()?;
    let snapshot = StoreSnapshot::from_json(&json)?;
    let mut restored = RowStore::from_snapshot(snapshot, StoreConfig::default())?;
    assert_ne!(restored.id(), store.id());
    assert_eq!(strings(&restored), vec!["a", "b", "c"]);
    assert_eq!(restored.column_types(), &[ValueKind::Str, ValueKind::Int][..]);
    assert!(!restored.is_sorted());

    let events = record(&mut restored);
    restored.append();
    assert_eq!(events.borrow().len(), 1);
    Ok(())
}

#[test]
fn snapshot_cells_are_converted_to_column_kinds() -> StoreResult<()> {
    let snapshot = StoreSnapshot {
        columns: vec![ValueKind::Long, ValueKind::Str],
        rows: vec![vec![Value::Int(7), Value::Bool(true)], vec![Value::Null, Value::Null]],
    };
    let store = RowStore::from_snapshot(snapshot, StoreConfig::default())?;
    let rows: Vec<Vec<Value>> = store.iter().map(|(_, row)| row.to_vec()).collect();
    assert_eq!(
        rows,
        vec![
            vec![Value::Long(7), Value::Str("true".into())],
            vec![Value::Long(0), Value::Str(String::new())],
        ]
    );
    Ok(())
}

#[test]
fn malformed_snapshots_are_rejected() {
    let short_row = StoreSnapshot {
        columns: vec![ValueKind::Int, ValueKind::Int],
        rows: vec![vec![Value::Int(1), Value::Int(2)], vec![Value::Int(3)]],
    };
    assert!(matches!(
        RowStore::from_snapshot(short_row, StoreConfig::default()),
        Err(StoreError::SnapshotArity {
            row: 1,
            expected: 2,
            found: 1
        })
    ));

    let unconvertible = StoreSnapshot {
        columns: vec![ValueKind::Int],
        rows: vec![vec![Value::Str("seven".into())]],
    };
    assert!(matches!(
        RowStore::from_snapshot(unconvertible, StoreConfig::default()),
        Err(StoreError::TypeMismatch { column: 0, .. })
    ));

    assert!(matches!(
        StoreSnapshot::from_json("{\"columns\": []"),
        Err(StoreError::Snapshot(_))
    ));
    assert!(matches!(
        RowStore::from_snapshot(
            StoreSnapshot {
                columns: Vec::new(),
                rows: Vec::new()
            },
            StoreConfig::default()
        ),
        Err(StoreError::InvalidSchema { .. })
    ));
}

#[test]
fn config_is_read_from_json() -> StoreResult<()> {
    let config = StoreConfig::from_json(r#"{"conversion": "lenient"}"#)?;
    assert_eq!(config.conversion, ConversionPolicy::Lenient);
    let store = RowStore::with_config(vec![ValueKind::Int], config.clone())?;
    assert_eq!(store.config().conversion, ConversionPolicy::Lenient);

    assert_eq!(
        StoreConfig::default().with_conversion(ConversionPolicy::Lenient),
        config
    );
    assert!(matches!(
        StoreConfig::from_json(r#"{"conversion": "loose"}"#),
        Err(StoreError::Snapshot(_))
    ));
    Ok(())
}
