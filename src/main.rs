use rowstore::{RowEvent, RowStore, SortColumn, SortOrder, StoreResult, ValueKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> StoreResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();

    let mut store = RowStore::new(vec![ValueKind::Str, ValueKind::Int, ValueKind::Double])?;
    store.connect(|_: &mut RowStore, event: &RowEvent| info!(event = ?event, "store changed"));

    for (account, id, balance) in [("Savings", 2, 9_001.12), ("Checking", 1, 1_250.45)] {
        store.insert_with_values(
            usize::MAX,
            [(0, account.into()), (1, id.into()), (2, balance.into())],
        )?;
    }
    let brokerage = store.append();
    store.set_values(brokerage, [(0, "Brokerage".into()), (1, 3.into())])?;

    println!("Insertion order:\n{}\n", store.render());

    store.set_sort_column(SortColumn::Column(0), SortOrder::Ascending)?;
    println!("Sorted by account:\n{}\n", store.render());

    store.set_value(brokerage, 0, "Trading".into())?;
    println!("After renaming:\n{}\n", store.render());

    store.set_sort_column(SortColumn::Unsorted, SortOrder::Ascending)?;
    if let (Some(first), Some(last)) = (store.first(), store.iter_at(store.len() - 1)) {
        store.swap(first, last)?;
    }
    println!("Swapped ends:\n{}", store.render());
    Ok(())
}
