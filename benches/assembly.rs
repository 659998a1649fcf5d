//! Benchmark: operator assembly over structured triangle grids
//!
//! Compares the sequential and Rayon-parallel drivers for each Element order.
//!
//! Run with:
//!   cargo bench --bench assembly
//!
//!   RAYON_NUM_THREADS=1 cargo bench --bench assembly -- parallel

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use tri_fem_2d::{assemble, par_assemble, CsrMatrix, ElementOrder, Mesh, NodeField, Operator};

const ORDERS: [ElementOrder; 3] = [ElementOrder::T3, ElementOrder::T6, ElementOrder::T10];

fn unit_square(order: ElementOrder, n: usize) -> Mesh {
    Mesh::grid(order, n, n, [0.0, 1.0], [0.0, 1.0]).expect("valid grid")
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly_sequential");
    group.measurement_time(Duration::from_secs(5));

    for order in ORDERS {
        for &n in &[8, 16, 32] {
            let mesh = unit_square(order, n);
            group.throughput(Throughput::Elements(mesh.num_elements() as u64));

            group.bench_with_input(BenchmarkId::new(order.to_string(), n), &mesh, |b, mesh| {
                b.iter(|| black_box(assemble(mesh, Operator::Full, None).expect("assembly")));
            });
        }
    }

    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly_parallel");
    group.measurement_time(Duration::from_secs(5));

    for order in ORDERS {
        for &n in &[32, 64] {
            let mesh = unit_square(order, n);
            let weights = NodeField::from_fn(mesh.nodes(), |p| 1.0 + p.x * p.y);
            group.throughput(Throughput::Elements(mesh.num_elements() as u64));

            group.bench_with_input(BenchmarkId::new(order.to_string(), n), &mesh, |b, mesh| {
                b.iter(|| {
                    black_box(par_assemble(mesh, Operator::Full, Some(&weights)).expect("assembly"))
                });
            });
        }
    }

    group.finish();
}

fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("coo_to_csr");

    for order in ORDERS {
        let mesh = unit_square(order, 32);
        let coo = assemble(&mesh, Operator::Full, None).expect("assembly");
        group.throughput(Throughput::Elements(coo.len() as u64));

        group.bench_with_input(BenchmarkId::new(order.to_string(), 32), &coo, |b, coo| {
            b.iter(|| black_box(CsrMatrix::from_coo(coo, mesh.num_nodes()).expect("in bounds")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sequential, bench_parallel, bench_compression);
criterion_main!(benches);
