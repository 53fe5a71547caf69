use rowstore::{RowIter, RowStore, SortColumn, SortOrder, StoreResult, ValueKind};

fn main() -> StoreResult<()> {
    let mut store = RowStore::new(vec![ValueKind::Str, ValueKind::Double])?;
    store.insert_with_values(usize::MAX, [(0, "Checking".into()), (1, 1_250.45_f64.into())])?;
    store.insert_with_values(usize::MAX, [(0, "Savings".into()), (1, 9_001.12_f64.into())])?;
    store.insert_with_values(usize::MAX, [(0, "Cash".into()), (1, 80.0_f64.into())])?;

    // Largest balance first, by a sort id that is not a column.
    const BY_BALANCE: usize = 100;
    store.set_sort_func(BY_BALANCE, |store: &RowStore, a: RowIter, b: RowIter| {
        let balance = |iter: RowIter| store.get::<f64>(iter, 1).unwrap_or_default();
        balance(b).total_cmp(&balance(a))
    });
    store.set_sort_column(SortColumn::Column(BY_BALANCE), SortOrder::Ascending)?;
    println!("By balance:\n{}", store.render());

    store.set_sort_column(SortColumn::Unsorted, SortOrder::Ascending)?;
    if let Some(cash) = store.iter_at(2) {
        store.move_before(cash, store.first())?;
    }
    println!("\nCash moved to the top:\n{}", store.render());

    let snapshot = store.snapshot();
    println!("\nSnapshot:\n{}", snapshot.to_json()?);
    Ok(())
}
