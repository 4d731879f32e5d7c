use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kd_index::{KdTree, KdTreeIndex, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::RTree;

fn load_data(n: usize) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..n)
        .map(|_| [rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)])
        .collect()
}

fn construct_kdtree(coords: &[[f64; 2]]) -> KdTree<usize, 2> {
    KdTree::try_from_pairs(coords.iter().copied().map(Point::new), 0..coords.len()).unwrap()
}

fn construct_rstar(coords: Vec<[f64; 2]>) -> RTree<[f64; 2]> {
    RTree::bulk_load(coords)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let coords = load_data(100_000);

    c.bench_function("construction (kd-index)", |b| {
        b.iter(|| construct_kdtree(&coords))
    });

    c.bench_function("construction (rstar bulk)", |b| {
        b.iter(|| construct_rstar(coords.to_vec()))
    });

    let kdtree = construct_kdtree(&coords);
    let rstar_tree = construct_rstar(coords.to_vec());
    let query = [-111.9, 40.7];

    c.bench_function("nearest (kd-index)", |b| {
        b.iter(|| kdtree.nearest_neighbor(black_box(&Point::new(query))).unwrap())
    });

    c.bench_function("nearest (rstar)", |b| {
        b.iter(|| rstar_tree.nearest_neighbor(black_box(&query)).unwrap())
    });

    c.bench_function("k nearest, k=10 (kd-index)", |b| {
        b.iter(|| {
            kdtree
                .k_nearest_neighbors(black_box(&Point::new(query)), 10)
                .unwrap()
        })
    });

    c.bench_function("k nearest, k=10 (rstar)", |b| {
        b.iter(|| {
            rstar_tree
                .nearest_neighbor_iter(black_box(&query))
                .take(10)
                .collect::<Vec<_>>()
        })
    });

    c.bench_function("within (kd-index)", |b| {
        b.iter(|| kdtree.within(black_box(&Point::new(query)), 5.).unwrap())
    });

    c.bench_function("within (rstar)", |b| {
        b.iter(|| {
            rstar_tree
                .locate_within_distance(black_box(query), 25.)
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
