use casedrops::{Case, CatalogEntry, ItemRoller, WearTables};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_pcg::Pcg32;

const TIERS: [&str; 5] = ["军规级", "受限", "保密", "隐秘", "非凡"];

fn gen_entries(n: usize) -> Vec<CatalogEntry> {
    (0..n)
        .map(|i| CatalogEntry {
            short_name: format!("物品 {i}"),
            rln: TIERS[i % TIERS.len()].to_string(),
            img: None,
        })
        .collect()
}

fn gen_case(n: usize) -> Case {
    Case::new("基准武器箱", gen_entries(n)).unwrap()
}

fn bench_case_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("case_build");
    for &n in &[5usize, 17, 64, 256] {
        let entries = gen_entries(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("case_new_n={n}"), |b| {
            b.iter(|| black_box(Case::new("基准武器箱", black_box(entries.clone())).unwrap()));
        });
    }
    group.finish();
}

fn bench_roll(c: &mut Criterion) {
    let mut group = c.benchmark_group("roll");
    const DRAWS_PER_ITER: usize = 1024;
    let roller = ItemRoller::new().unwrap();

    for &n in &[5usize, 17, 64, 256] {
        let case = gen_case(n);
        group.throughput(Throughput::Elements(DRAWS_PER_ITER as u64));

        group.bench_function(format!("roll_n={n}"), |b| {
            b.iter_batched_ref(
                || Pcg32::seed_from_u64(999),
                |rng| {
                    let mut s = 0u16;
                    for _ in 0..DRAWS_PER_ITER {
                        s ^= roller.roll(&case, rng).template_id;
                    }
                    black_box(s)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_wear(c: &mut Criterion) {
    let mut group = c.benchmark_group("wear");
    const DRAWS_PER_ITER: usize = 1024;
    let tables = WearTables::new().unwrap();
    group.throughput(Throughput::Elements(DRAWS_PER_ITER as u64));

    for name in ["AK-47 | 传承", "蝴蝶刀 | 多普勒"] {
        let table = tables.for_name(name);
        group.bench_function(name, |b| {
            b.iter_batched_ref(
                || Pcg32::seed_from_u64(1001),
                |rng| {
                    let mut s = 0.0f64;
                    for _ in 0..DRAWS_PER_ITER {
                        s += table.roll(rng).1;
                    }
                    black_box(s)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(roll, bench_case_build, bench_roll, bench_wear);
criterion_main!(roll);
