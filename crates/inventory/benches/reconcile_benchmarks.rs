use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use skusync_core::{SkuBatchId, SkuId, WarehouseId};
use skusync_inventory::{
    ReconciliationInput, SkuBatchRecord, WarehouseMeta, find_deltas, find_missing, reconcile,
};

fn sku_batches(count: usize) -> Vec<SkuBatchRecord> {
    (0..count)
        .map(|i| {
            SkuBatchRecord::new(SkuBatchId::new(format!("sku-batch-{i}")).unwrap())
                .with_sku_id(SkuId::new(format!("sku-{}", i % 97)).unwrap())
                .with_quantity_per_unit_of_measure((i % 12) as i64 + 1)
        })
        .collect()
}

fn warehouses(count: usize) -> Vec<WarehouseMeta> {
    (0..count)
        .map(|i| WarehouseMeta::new(WarehouseId::new(format!("wh-{i}")).unwrap()))
        .collect()
}

/// Application data with 10% new records and 10% changed records.
fn datasets(size: usize) -> (Vec<SkuBatchRecord>, Vec<SkuBatchRecord>) {
    let app = sku_batches(size);
    let inventory: Vec<SkuBatchRecord> = app
        .iter()
        .take(size - size / 10)
        .enumerate()
        .map(|(i, r)| if i % 10 == 0 { r.clone().archived(true) } else { r.clone() })
        .collect();
    (app, inventory)
}

fn bench_find_missing(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_missing");
    for size in [1_000usize, 10_000, 100_000] {
        let (app, inventory) = datasets(size);
        let app_ids: Vec<SkuBatchId> = app.iter().map(|r| r.sku_batch_id.clone()).collect();
        let inventory_ids: Vec<SkuBatchId> =
            inventory.iter().map(|r| r.sku_batch_id.clone()).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(find_missing(&app_ids, &inventory_ids)))
        });
    }
    group.finish();
}

fn bench_find_deltas(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_deltas");
    for size in [1_000usize, 10_000, 100_000] {
        let (app, inventory) = datasets(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(find_deltas(&app, &inventory)))
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let warehouses = warehouses(4);
    for size in [1_000usize, 10_000] {
        let (app, inventory) = datasets(size);
        let inventory_ids: Vec<SkuBatchId> =
            inventory.iter().map(|r| r.sku_batch_id.clone()).collect();
        let input = ReconciliationInput {
            app_records: &app,
            inventory_ids: &inventory_ids,
            inventory_records: &inventory,
            warehouses: &warehouses,
        };

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| black_box(reconcile(input)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_missing, bench_find_deltas, bench_reconcile);
criterion_main!(benches);
