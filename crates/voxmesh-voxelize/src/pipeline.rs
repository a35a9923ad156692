use voxmesh_grid::{VoxelGrid, VoxelType};

use crate::fill::{FillStats, fill_interior};
use crate::mesh::{MeshError, TriangleMesh};
use crate::normals::{NormalStats, compute_surface_normals};
use crate::raster::{VoxelizeStats, voxelize_mesh};
use crate::surface::mark_surface;

/// Which passes to run after voxelization, and with which values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    pub target: VoxelType,
    pub fill: Option<VoxelType>,
    pub surface: Option<VoxelType>,
    pub normals: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            target: VoxelType::SOLID,
            fill: Some(VoxelType::SOLID),
            surface: Some(VoxelType::SURFACE),
            normals: true,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    pub voxelize: VoxelizeStats,
    pub fill: Option<FillStats>,
    pub surface_marked: Option<usize>,
    pub normals: Option<NormalStats>,
}

/// Voxelize, fill, mark surface, compute normals; always in that order.
/// A mesh rejected by voxelization stops the run before any pass writes.
pub fn run_pipeline(
    grid: &mut VoxelGrid,
    mesh: &TriangleMesh,
    options: &PipelineOptions,
) -> Result<PipelineReport, MeshError> {
    let mut report = PipelineReport {
        voxelize: voxelize_mesh(grid, mesh, options.target)?,
        ..Default::default()
    };
    if let Some(value) = options.fill {
        report.fill = Some(fill_interior(grid, value));
    }
    if let Some(value) = options.surface {
        report.surface_marked = Some(mark_surface(grid, value));
    }
    if options.normals {
        if options.surface != Some(VoxelType::SURFACE) {
            log::debug!(
                "normals requested without SURFACE marking; only existing SURFACE voxels qualify"
            );
        }
        report.normals = Some(compute_surface_normals(grid, mesh));
    }
    log::debug!(
        "pipeline done: chunks={} voxels={}",
        grid.chunk_count(),
        grid.voxel_count()
    );
    Ok(report)
}
