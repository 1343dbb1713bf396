#![allow(missing_docs)]
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use vac_complex::{EditorConfig, NodeId, Point2, Stroke, Time, VacEditor};

/// Build a chain of n edges: v0 -- v1 -- ... -- vn.
fn build_chain(n: usize) -> (VacEditor, Vec<NodeId>, Vec<NodeId>) {
    let mut ed = VacEditor::new(EditorConfig::default());
    let root = ed.root();
    let t = Time(0);
    let mut vertices = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let v = ed
            .create_key_vertex(Point2::new(i as f64, 0.0), root, None, t)
            .expect("vertex");
        vertices.push(v);
    }
    let mut edges = Vec::with_capacity(n);
    for i in 0..n {
        let stroke = Stroke::line(
            Point2::new(i as f64, 0.0),
            Point2::new((i + 1) as f64, 0.0),
            1.0,
        );
        let e = ed
            .create_key_open_edge(vertices[i], vertices[i + 1], stroke, root, None)
            .expect("edge");
        edges.push(e);
    }
    (ed, vertices, edges)
}

fn bench_create_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_chain");
    for &n in &[10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| build_chain(n))
        });
    }
    group.finish();
}

fn bench_move_and_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_and_resample");
    for &n in &[10usize, 100] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || build_chain(n),
                |(mut ed, vertices, edges)| {
                    // Drag the middle vertex and force the lazy resample
                    // of every dirty edge.
                    let mid = vertices[vertices.len() / 2];
                    ed.set_key_vertex_position(mid, Point2::new(0.0, 5.0))
                        .expect("move");
                    for &e in &edges {
                        let _ = ed.edge_sampled(e).expect("sampled");
                    }
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo_redo");
    for &n in &[10usize, 100] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || build_chain(n).0,
                |mut ed| {
                    while ed.undo_one().expect("undo") {}
                    while ed.redo_one().expect("redo") {}
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

fn bench_cut(c: &mut Criterion) {
    let mut group = c.benchmark_group("cut_edge");
    for &k in &[1usize, 4, 16] {
        group.throughput(Throughput::Elements(k as u64));
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter_batched(
                || {
                    let (ed, _, edges) = build_chain(1);
                    let params: Vec<f64> =
                        (1..=k).map(|i| i as f64 / (k + 1) as f64).collect();
                    (ed, edges[0], params)
                },
                |(mut ed, edge, params)| {
                    ed.cut_key_edge(edge, &params).expect("cut");
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_create_chain,
    bench_move_and_resample,
    bench_undo_redo,
    bench_cut
);
criterion_main!(benches);
