use std::time::Instant;

use voxmesh_geom::triangle_normal;
use voxmesh_grid::{VoxelGrid, VoxelType};

use crate::mesh::TriangleMesh;
use crate::raster::triangle_footprint;

/// Normals closer than this (1 - dot) are treated as the same facet.
const SAME_FACET_EPS: f64 = 1e-6;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalStats {
    pub triangles: usize,
    pub skipped_degenerate: usize,
    pub out_of_range: usize,
    pub appended: usize,
    pub merged: usize,
    pub voxels: usize,
}

/// Rebuilds the grid's normal map from `mesh`.
///
/// Each triangle's footprint is recomputed exactly as in voxelization and
/// restricted to voxels currently SURFACE; its unit face normal is appended
/// to each of them. A normal matching one already stored on the voxel is
/// not appended again, so coplanar triangles sharing voxels leave a single
/// entry while differently oriented faces keep their own. Triangles outside
/// the addressable voxel range contribute nothing.
pub fn compute_surface_normals(grid: &mut VoxelGrid, mesh: &TriangleMesh) -> NormalStats {
    let t0 = Instant::now();
    grid.clear_surface_normals();
    let mapper = *grid.mapper();
    let mut stats = NormalStats {
        triangles: mesh.triangle_count(),
        ..Default::default()
    };
    let mut hits = Vec::new();
    for tri in mesh.iter_triangles() {
        let Some(n) = triangle_normal(tri[0], tri[1], tri[2]) else {
            stats.skipped_degenerate += 1;
            continue;
        };
        hits.clear();
        let scanned = triangle_footprint(&mapper, tri, |v| {
            if grid.get(v) == VoxelType::SURFACE {
                hits.push(v);
            }
        });
        if scanned.is_none() {
            stats.out_of_range += 1;
            continue;
        }
        for &v in &hits {
            let dup = grid
                .get_surface_normals(v)
                .iter()
                .any(|m| m.dot(n) >= 1.0 - SAME_FACET_EPS);
            if dup {
                stats.merged += 1;
            } else {
                grid.add_surface_normal(v, n);
                stats.appended += 1;
            }
        }
    }
    stats.voxels = grid.surface_normal_count();
    log::info!(
        target: "perf",
        "ms={} surface_normals tris={} degenerate={} out_of_range={} appended={} merged={} voxels={}",
        t0.elapsed().as_millis(),
        stats.triangles,
        stats.skipped_degenerate,
        stats.out_of_range,
        stats.appended,
        stats.merged,
        stats.voxels
    );
    stats
}
