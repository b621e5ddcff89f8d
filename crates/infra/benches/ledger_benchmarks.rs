use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rust_decimal::Decimal;
use stockmaster_core::{MovementId, ProductId, WarehouseId};
use stockmaster_infra::ledger::{InMemoryLedgerStore, StockLedger};
use stockmaster_inventory::{AdjustStock, MovementKind, StockKey, plan_adjustment};
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime")
}

fn receipt(key: StockKey) -> AdjustStock {
    AdjustStock::new(key.product_id, key.warehouse_id, Decimal::ONE, MovementKind::Receipt)
}

fn bench_plan_adjustment(c: &mut Criterion) {
    let key = StockKey::new(ProductId::new(), WarehouseId::new());
    let cmd = receipt(key);
    let current = plan_adjustment(None, &cmd, MovementId::new()).expect("plan").level;

    c.bench_function("plan_adjustment", |b| {
        b.iter(|| plan_adjustment(black_box(Some(&current)), black_box(&cmd), MovementId::new()))
    });
}

fn bench_adjust_single_key(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("adjust_single_key");
    group.throughput(Throughput::Elements(1));

    group.bench_function("in_memory", |b| {
        let ledger = StockLedger::new(Arc::new(InMemoryLedgerStore::new()));
        let key = StockKey::new(ProductId::new(), WarehouseId::new());
        b.iter(|| rt.block_on(ledger.adjust(black_box(receipt(key)))).expect("adjust"));
    });

    group.finish();
}

fn bench_adjust_many_keys(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("adjust_many_keys");

    for key_count in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(key_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(key_count), &key_count, |b, &n| {
            let ledger = StockLedger::new(Arc::new(InMemoryLedgerStore::new()));
            let keys: Vec<StockKey> = (0..n)
                .map(|_| StockKey::new(ProductId::new(), WarehouseId::new()))
                .collect();
            b.iter(|| {
                rt.block_on(async {
                    for key in &keys {
                        ledger.adjust(receipt(*key)).await.expect("adjust");
                    }
                })
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_plan_adjustment,
    bench_adjust_single_key,
    bench_adjust_many_keys
);
criterion_main!(benches);
