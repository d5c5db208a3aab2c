use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use calosplit::{
    find_local_maxima, select_dominant_pair, split_energy, CaloCells, CaloEvent, CategoryTally,
    CellIndex, Cluster, ClusterCells, Decomposer, LocalMaximaConfig, ModuleGridGeometry,
};

/// Two overlapping showers on a `size x size` patch straddling the boundary
/// of modules 1 and 0, plus a little noise.
fn make_merged_cluster(geom: &ModuleGridGeometry, size: i32, seed: u64) -> (Vec<u32>, CaloCells) {
    let mut rng = StdRng::seed_from_u64(seed);
    let peaks = [(10.0f64, 47.0f64, 8.0f64), (11.0, 49.0, 5.0)];
    let mut ids = Vec::new();
    let mut cells = CaloCells::new();
    for row in 8..8 + size {
        for shared_col in 48 - size / 2..48 + size / 2 {
            let (module, col) = if shared_col < 48 {
                (1, shared_col)
            } else {
                (0, shared_col - 48)
            };
            let Some(id) = geom.cell_id(CellIndex { module, row, col }) else {
                continue;
            };
            let amplitude: f64 = peaks
                .iter()
                .map(|&(r, c, e)| {
                    let d2 = (row as f64 - r).powi(2) + (shared_col as f64 - c).powi(2);
                    e * (-d2 / 1.5).exp()
                })
                .sum::<f64>()
                + rng.gen_range(-0.02..0.02);
            ids.push(id);
            cells.insert(id, amplitude);
        }
    }
    (ids, cells)
}

fn bench_maxima(c: &mut Criterion) {
    let geom = ModuleGridGeometry::default();
    let (ids, amps) = make_merged_cluster(&geom, 6, 7);
    let cells = ClusterCells::resolve(&ids, &geom, &amps).expect("fixture resolves");
    let config = LocalMaximaConfig::default();

    c.bench_function("local_maxima_36cells", |b| {
        b.iter(|| black_box(find_local_maxima(black_box(&cells), black_box(&config))).len())
    });
}

fn bench_split(c: &mut Criterion) {
    let geom = ModuleGridGeometry::default();
    let (ids, amps) = make_merged_cluster(&geom, 6, 7);
    let cells = ClusterCells::resolve(&ids, &geom, &amps).expect("fixture resolves");
    let maxima = find_local_maxima(&cells, &LocalMaximaConfig::default());
    let seeds = select_dominant_pair(&maxima, &cells).expect("fixture has two seeds");

    c.bench_function("split_energy_36cells", |b| {
        b.iter(|| {
            let split = split_energy(black_box(&cells), black_box(seeds))
                .expect("fixture seeds are distinct");
            black_box(split.assigned_energy())
        })
    });
}

fn bench_event(c: &mut Criterion) {
    let geom = ModuleGridGeometry::default();
    let mut event = CaloEvent::default();
    for seed in 0..20 {
        let (ids, amps) = make_merged_cluster(&geom, 5, seed);
        let energy = ids.iter().map(|&id| amps.raw_amplitude(id)).sum();
        for &id in &ids {
            event.cells.insert(id, amps.raw_amplitude(id));
        }
        event.clusters.push(Cluster::new(ids, energy, 0.5));
    }
    let decomposer = Decomposer::new(geom);

    c.bench_function("process_event_20clusters", |b| {
        b.iter(|| {
            let mut tally = CategoryTally::new();
            let report = decomposer.process_event(black_box(&event), &mut tally);
            black_box(report.clusters.len())
        })
    });
}

criterion_group!(hotpaths, bench_maxima, bench_split, bench_event);
criterion_main!(hotpaths);
