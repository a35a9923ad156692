mod config;

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use voxmesh_grid::VoxelGrid;
use voxmesh_voxelize::run_pipeline;

use crate::config::{VoxmeshConfig, load_config, load_mesh};

#[derive(Parser, Debug)]
#[command(name = "voxmesh", version, about = "Voxelize a triangle mesh into a sparse chunked grid")]
struct Args {
    /// Mesh file (TOML with `vertices` and `triangles`)
    #[arg(long)]
    mesh: PathBuf,
    /// Optional config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides `[grid] cell_size`
    #[arg(long)]
    cell_size: Option<f64>,
    /// Write the grid payload here as TOML
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    no_fill: bool,
    #[arg(long)]
    no_surface: bool,
    #[arg(long)]
    no_normals: bool,
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, cfg: &mut VoxmeshConfig) {
        if let Some(cs) = self.cell_size {
            cfg.grid.cell_size = cs;
        }
        if self.no_fill {
            cfg.passes.fill = false;
        }
        if self.no_surface {
            cfg.passes.surface = false;
        }
        if self.no_normals {
            cfg.passes.normals = false;
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => VoxmeshConfig::default(),
    };
    args.apply(&mut cfg);

    let mesh = load_mesh(&args.mesh)?;
    log::info!(
        "loaded {} ({} vertices, {} triangles)",
        args.mesh.display(),
        mesh.vertices().len(),
        mesh.triangle_count()
    );

    let t0 = Instant::now();
    let mut grid = VoxelGrid::new(cfg.grid.cell_size, cfg.origin())?;
    let report = run_pipeline(&mut grid, &mesh, &cfg.pipeline_options())?;
    log::debug!("{:?}", report);
    if cfg.output.prune_empty {
        let pruned = grid.prune_empty_chunks();
        log::debug!("pruned {} empty chunks", pruned);
    }
    let stats = grid.stats();
    log::info!(
        target: "perf",
        "ms={} total chunks={} empty_chunks={} voxels={} normal_voxels={}",
        t0.elapsed().as_millis(),
        stats.chunks,
        stats.empty_chunks,
        stats.voxels,
        stats.normal_voxels
    );

    if let Some(out) = &args.out {
        let s = toml::to_string(&grid.to_payload())?;
        fs::write(out, s)?;
        log::info!("wrote {}", out.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "voxmesh",
            "--mesh",
            "m.toml",
            "--cell-size",
            "0.5",
            "--no-fill",
            "--no-normals",
        ])
        .unwrap();
        let mut cfg = VoxmeshConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.grid.cell_size, 0.5);
        assert!(!cfg.passes.fill);
        assert!(cfg.passes.surface);
        assert!(!cfg.passes.normals);
    }

    #[test]
    fn mesh_is_required() {
        assert!(Args::try_parse_from(["voxmesh"]).is_err());
    }
}
