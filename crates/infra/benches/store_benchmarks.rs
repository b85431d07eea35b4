use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use stockroom_infra::{InMemoryWorkbook, InventoryStore, Workbook};
use stockroom_inventory::{
    Category, IssueStock, ProductId, ReceiveStock, ShelfId, StockFilter, StockTable,
};

const SHELVES: [&str; 4] = ["A1", "B2", "C3", "C4"];

fn receipt(i: usize, quantity: u32) -> ReceiveStock {
    ReceiveStock {
        product_id: ProductId::new(format!("P{i:06}")).unwrap(),
        name: format!("Product {i}"),
        category: Category::ALL[i % Category::ALL.len()],
        quantity,
        shelf: ShelfId::new(SHELVES[i % SHELVES.len()]).unwrap(),
        supplier: None,
        received_at: Utc::now(),
    }
}

fn seeded_table(rows: usize) -> StockTable {
    let mut table = StockTable::new();
    for i in 0..rows {
        table.receive(&receipt(i, 1_000)).unwrap();
    }
    table
}

fn seeded_store(rows: usize) -> InventoryStore<InMemoryWorkbook> {
    let mut workbook = Workbook::fresh();
    workbook.set_table(seeded_table(rows));
    InventoryStore::new(InMemoryWorkbook::with_workbook(workbook))
}

/// Full read-modify-write cycle: one movement rewrites the whole workbook.
fn bench_movement_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("movement_latency");

    for rows in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("receive_existing", rows), rows, |b, &rows| {
            let store = seeded_store(rows);
            let cmd = receipt(rows / 2, 1);
            b.iter(|| black_box(store.receive(&cmd).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("issue_one", rows), rows, |b, &rows| {
            let store = seeded_store(rows);
            let cmd = IssueStock {
                product_id: ProductId::new(format!("P{:06}", rows / 2)).unwrap(),
                quantity: 1,
            };
            // Top up before the record drains.
            let top_up = receipt(rows / 2, 1);
            b.iter(|| {
                black_box(store.issue(&cmd).unwrap());
                store.receive(&top_up).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_list_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_filters");

    for rows in [100, 1000, 10000].iter() {
        let table = seeded_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("by_category", rows), &table, |b, table| {
            let filter = StockFilter::new().category(Category::Home);
            b.iter(|| black_box(table.list(&filter)));
        });

        group.bench_with_input(BenchmarkId::new("most_recent_10", rows), &table, |b, table| {
            let filter = StockFilter::new().most_recent(10);
            b.iter(|| black_box(table.list(&filter)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_movement_latency, bench_list_filters);
criterion_main!(benches);
