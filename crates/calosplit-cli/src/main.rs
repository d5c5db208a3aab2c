//! calosplit CLI: merged-cluster decomposition from event files.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use calosplit::{
    CategoryTally, CellGeometry, CellId, DecomposeConfig, Decomposer, EventFile, EventReport,
    MassWindow, ModuleGridGeometry, StatusKind,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "calosplit")]
#[command(about = "Split merged calorimeter clusters and reconstruct pair invariant masses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose every cluster of an event file.
    Decompose(CliDecomposeArgs),

    /// Print the analysis cuts in effect.
    ConfigInfo(CliCutArgs),

    /// Print the default module-grid geometry.
    GeometryInfo,

    /// Evaluate the neighbor test for two cell ids on the default geometry.
    Neighbors {
        #[arg(long)]
        a: CellId,
        #[arg(long)]
        b: CellId,
    },
}

#[derive(Debug, Clone, Args)]
struct CliDecomposeArgs {
    /// Path to the input event file (`calosplit.event.v1` JSON).
    #[arg(long)]
    event: PathBuf,

    /// Path to write the per-cluster report and category tally (JSON).
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    cuts: CliCutArgs,
}

#[derive(Debug, Clone, Args)]
struct CliCutArgs {
    /// JSON config applied before the individual overrides below.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum shower width (m02) for mass reconstruction.
    #[arg(long)]
    m02_cut: Option<f64>,

    /// Minimum number of cells per cluster.
    #[arg(long)]
    min_cells: Option<usize>,

    /// Minimum cluster energy.
    #[arg(long)]
    min_energy: Option<f64>,

    /// Maximum cluster energy.
    #[arg(long)]
    max_energy: Option<f64>,

    /// Minimum energy gap between a local maximum and its neighbors.
    #[arg(long)]
    local_max_cut: Option<f64>,

    /// Minimum energy of a reported local maximum.
    #[arg(long)]
    min_seed_energy: Option<f64>,

    /// Pi0 mass window as `min,max`.
    #[arg(long, value_parser = parse_window)]
    pi0_window: Option<MassWindow>,

    /// Eta mass window as `min,max`.
    #[arg(long, value_parser = parse_window)]
    eta_window: Option<MassWindow>,

    /// Conversion mass window as `min,max`.
    #[arg(long, value_parser = parse_window)]
    conv_window: Option<MassWindow>,

    /// Ignore truth tags when routing results.
    #[arg(long)]
    no_truth: bool,
}

fn parse_window(s: &str) -> Result<MassWindow, String> {
    let (min, max) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'min,max', got '{}'", s))?;
    let min: f64 = min.trim().parse().map_err(|e| format!("bad min: {}", e))?;
    let max: f64 = max.trim().parse().map_err(|e| format!("bad max: {}", e))?;
    Ok(MassWindow::new(min, max))
}

impl CliCutArgs {
    fn to_config(&self) -> CliResult<DecomposeConfig> {
        let mut config = match &self.config {
            Some(path) => DecomposeConfig::from_json_file(path)?,
            None => DecomposeConfig::default(),
        };

        let selection = &mut config.selection;
        if let Some(v) = self.m02_cut {
            selection.m02_cut = v;
        }
        if let Some(v) = self.min_cells {
            selection.min_cells = v;
        }
        if let Some(v) = self.min_energy {
            selection.min_energy = v;
        }
        if let Some(v) = self.max_energy {
            selection.max_energy = v;
        }

        if let Some(v) = self.local_max_cut {
            config.local_maxima.local_max_cut = v;
        }
        if let Some(v) = self.min_seed_energy {
            config.local_maxima.min_seed_energy = v;
        }

        if let Some(w) = self.pi0_window {
            config.mass_windows.pion = w;
        }
        if let Some(w) = self.eta_window {
            config.mass_windows.eta = w;
        }
        if let Some(w) = self.conv_window {
            config.mass_windows.conversion = w;
        }
        if self.no_truth {
            config.use_truth = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(serde::Serialize)]
struct DecomposeOutput<'a> {
    schema: &'static str,
    config: &'a DecomposeConfig,
    events: &'a [EventReport],
    tally: &'a CategoryTally,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decompose(args) => run_decompose(&args),
        Commands::ConfigInfo(args) => run_config_info(&args),
        Commands::GeometryInfo => run_geometry_info(),
        Commands::Neighbors { a, b } => run_neighbors(a, b),
    }
}

// ── decompose ──────────────────────────────────────────────────────────

fn run_decompose(args: &CliDecomposeArgs) -> CliResult<()> {
    let config = args.cuts.to_config()?;
    tracing::info!("Loading events from {}", args.event.display());
    let file = EventFile::from_json_file(&args.event)?;
    let decomposer = Decomposer::from_event_file(&file, config)?;

    let mut tally = CategoryTally::new();
    let reports: Vec<EventReport> = file
        .events
        .iter()
        .map(|event| decomposer.process_event(event, &mut tally))
        .collect();

    let n_clusters: usize = reports.iter().map(|r| r.clusters.len()).sum();
    let count = |kind: StatusKind| reports.iter().map(|r| r.count(kind)).sum::<usize>();
    tracing::info!(
        "{} events, {} clusters: {} reconstructed, {} narrow, {} rejected, {} failed",
        reports.len(),
        n_clusters,
        count(StatusKind::Reconstructed),
        count(StatusKind::NarrowShower),
        count(StatusKind::Rejected),
        count(StatusKind::Failed)
    );
    for (category, counts) in tally.iter() {
        if let Some(mean) = counts.mean_mass() {
            tracing::info!(
                "  {:<10} {} masses, mean {:.4}",
                category.label(),
                counts.n_mass,
                mean
            );
        }
    }

    let output = DecomposeOutput {
        schema: "calosplit.report.v1",
        config: decomposer.config(),
        events: &reports,
        tally: &tally,
    };
    let json = serde_json::to_string_pretty(&output)?;
    std::fs::write(&args.out, json)?;
    tracing::info!("Results written to {}", args.out.display());

    Ok(())
}

// ── config-info ────────────────────────────────────────────────────────

fn run_config_info(args: &CliCutArgs) -> CliResult<()> {
    let config = args.to_config()?;
    println!("{}", config);
    Ok(())
}

// ── geometry-info ──────────────────────────────────────────────────────

fn run_geometry_info() -> CliResult<()> {
    let geometry = ModuleGridGeometry::default();
    let p = geometry.params();

    println!("calosplit default module grid");
    println!("  modules:        {}", p.n_modules);
    println!("  cells/module:   {} rows x {} cols", p.rows, p.cols);
    println!("  total cells:    {}", geometry.n_cells());
    println!("  cell size:      {}", p.cell_size);
    println!("  radius:         {}", p.radius);
    println!("  phi start:      {:.2} deg", p.phi_start.to_degrees());

    let last = geometry.n_cells() - 1;
    for id in [0, last] {
        if let (Some(index), Some(pos)) = (geometry.cell_index(id), geometry.global_position(id)) {
            println!(
                "  cell {:>5}:     module {} row {} col {} at ({:.1}, {:.1}, {:.1})",
                id, index.module, index.row, index.col, pos.x, pos.y, pos.z
            );
        }
    }

    Ok(())
}

// ── neighbors ──────────────────────────────────────────────────────────

fn run_neighbors(a: CellId, b: CellId) -> CliResult<()> {
    let decomposer = Decomposer::new(ModuleGridGeometry::default());
    let geometry = decomposer.geometry();

    for id in [a, b] {
        let index = geometry
            .cell_index(id)
            .ok_or_else(|| format!("cell {} is outside the default grid", id))?;
        println!(
            "cell {}: module {} row {} col {}",
            id, index.module, index.row, index.col
        );
    }
    println!("neighbors: {}", decomposer.are_neighbors(a, b));

    Ok(())
}
