use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ewas_explorer::processing::{FilterCriteria, SortKey, ViewModel, ViewOptions};
use ewas_explorer::types::Row;

fn rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| Row {
            phenotype: ["AD", "BMI", "Smoking"][i % 3].to_string(),
            tissue: ["Blood", "Liver"][i % 2].to_string(),
            r#type: "Survival".to_string(),
            method: "Beta".to_string(),
            n: Some(100 + (i % 50) as u64),
            cpg: format!("cg{i:08}"),
            location: format!("chr{}:{}", i % 22 + 1, i * 37),
            gene: format!("GENE{}", i % 997),
            beta: ((i * 7919) % 1000) as f64 / 1000.0 - 0.5,
            p: ((i * 104_729) % 100_000 + 1) as f64 * 1e-7,
            source: "bench.csv".to_string(),
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    for size in [10_000usize, 100_000] {
        let mut vm = ViewModel::new(ViewOptions::default());
        vm.append_rows(rows(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("tissue_and_query", size), &size, |b, _| {
            b.iter(|| {
                vm.set_criteria(FilterCriteria::default().with_tissue("Blood").with_query("gene1"));
                black_box(vm.filtered_len())
            })
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    for size in [10_000usize, 100_000] {
        let mut vm = ViewModel::new(ViewOptions::default());
        vm.append_rows(rows(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("toggle_p", size), &size, |b, _| {
            b.iter(|| {
                vm.toggle_sort(SortKey::P);
                black_box(vm.page_rows().len())
            })
        });
        group.bench_with_input(BenchmarkId::new("toggle_gene", size), &size, |b, _| {
            b.iter(|| {
                vm.toggle_sort(SortKey::Gene);
                black_box(vm.page_rows().len())
            })
        });
    }
    group.finish();
}

fn bench_append(c: &mut Criterion) {
    let batch = rows(4_000);
    c.bench_function("append_25_batches_sorted", |b| {
        b.iter(|| {
            let mut vm = ViewModel::new(ViewOptions::default());
            for _ in 0..25 {
                vm.append_rows(batch.clone());
            }
            black_box(vm.filtered_len())
        })
    });
}

criterion_group!(benches, bench_filter, bench_sort, bench_append);
criterion_main!(benches);
