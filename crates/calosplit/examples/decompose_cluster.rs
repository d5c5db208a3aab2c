use calosplit::{CaloCells, CellIndex, Cluster, Decomposer, ModuleGridGeometry};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let separation: i32 = match args.get(1) {
        Some(s) => s.parse()?,
        None => 3,
    };

    let geometry = ModuleGridGeometry::default();
    let mut cells = CaloCells::new();
    let mut ids = Vec::new();
    // Two photon showers `separation` columns apart in module 4.
    for (row, col, energy) in [
        (10, 20, 6.0),
        (10, 21, 1.5),
        (11, 20, 1.2),
        (10, 20 + separation, 3.5),
        (11, 20 + separation, 0.9),
    ] {
        let id = geometry
            .cell_id(CellIndex { module: 4, row, col })
            .ok_or("cell outside the default grid")?;
        if !ids.contains(&id) {
            ids.push(id);
        }
        cells.insert(id, energy);
    }
    let energy = ids.iter().map(|&id| cells.raw_amplitude(id)).sum();
    let cluster = Cluster::new(ids, energy, 0.45);

    let decomposer = Decomposer::new(geometry);
    let d = decomposer.decompose(&cluster, &cells, None)?;
    println!("{} local maxima", d.maxima.len());
    println!(
        "sub-clusters: E1={:.3} ({} cells), E2={:.3} ({} cells), {} unassigned",
        d.pair.first.energy,
        d.pair.first.n_cells(),
        d.pair.second.energy,
        d.pair.second.n_cells(),
        d.pair.n_unassigned
    );
    println!("pair mass {:.4} -> {:?}", d.pair.mass, d.pair.class);
    Ok(())
}
