use std::time::Instant;

use voxmesh_geom::{Vec3, tri_box_overlap, triangle_normal};
use voxmesh_grid::{CoordinateMapper, VoxelGrid, VoxelPos, VoxelType};

use crate::mesh::{MeshError, TriangleMesh};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelizeStats {
    pub triangles: usize,
    pub degenerate: usize,
    pub candidates: usize,
    pub written: usize,
}

// Voxel `v` is the box centered at `v + 0.5` in voxel space.
const HALF_VOXEL: Vec3 = Vec3::splat(0.5);

fn to_voxel_space(mapper: &CoordinateMapper, tri: [Vec3; 3]) -> [Vec3; 3] {
    tri.map(|p| mapper.to_voxel_space(p))
}

/// Inclusive candidate range of `tri`: every voxel owning a point of the
/// triangle's bounds. `None` when the range reaches past `VOXEL_LIMIT`.
pub fn triangle_voxel_range(
    mapper: &CoordinateMapper,
    tri: [Vec3; 3],
) -> Option<(VoxelPos, VoxelPos)> {
    let q = to_voxel_space(mapper, tri);
    mapper.voxel_range(q[0].min(q[1]).min(q[2]), q[0].max(q[1]).max(q[2]))
}

/// Calls `visit` for every voxel whose half-open box overlaps `tri`,
/// scanning the candidate range in z, y, x order. The test runs in voxel
/// space, so the range and the overlap test agree on which cell owns a
/// point lying on a grid plane.
///
/// Returns the number of candidates tested, or `None` without visiting
/// anything when the triangle is out of range.
pub fn triangle_footprint(
    mapper: &CoordinateMapper,
    tri: [Vec3; 3],
    mut visit: impl FnMut(VoxelPos),
) -> Option<usize> {
    let q = to_voxel_space(mapper, tri);
    let (vmin, vmax) =
        mapper.voxel_range(q[0].min(q[1]).min(q[2]), q[0].max(q[1]).max(q[2]))?;
    let mut candidates = 0usize;
    for z in vmin.2..=vmax.2 {
        for y in vmin.1..=vmax.1 {
            for x in vmin.0..=vmax.0 {
                candidates += 1;
                let center = Vec3::new(x as f64 + 0.5, y as f64 + 0.5, z as f64 + 0.5);
                if tri_box_overlap(center, HALF_VOXEL, q) {
                    visit((x, y, z));
                }
            }
        }
    }
    Some(candidates)
}

/// Writes `target` into every voxel overlapped by a triangle of `mesh`.
///
/// Triangles are processed in index order and each overlapping voxel is
/// overwritten, so where triangles share voxels the later one wins.
/// Zero-area triangles are still rasterized along their degenerate
/// footprint. Every triangle is range-checked first; if any falls outside
/// the addressable voxel range nothing is written.
pub fn voxelize_mesh(
    grid: &mut VoxelGrid,
    mesh: &TriangleMesh,
    target: VoxelType,
) -> Result<VoxelizeStats, MeshError> {
    let t0 = Instant::now();
    let mapper = *grid.mapper();
    if let Some(triangle) = mesh
        .iter_triangles()
        .position(|t| triangle_voxel_range(&mapper, t).is_none())
    {
        return Err(MeshError::OutOfGridRange { triangle });
    }
    let mut stats = VoxelizeStats {
        triangles: mesh.triangle_count(),
        ..Default::default()
    };
    for tri in mesh.iter_triangles() {
        if triangle_normal(tri[0], tri[1], tri[2]).is_none() {
            stats.degenerate += 1;
        }
        let mut written = 0usize;
        let candidates = triangle_footprint(&mapper, tri, |v| {
            grid.set(v, target);
            written += 1;
        });
        stats.candidates += candidates.unwrap_or(0);
        stats.written += written;
    }
    log::info!(
        target: "perf",
        "ms={} voxelize tris={} degenerate={} candidates={} written={} chunks={}",
        t0.elapsed().as_millis(),
        stats.triangles,
        stats.degenerate,
        stats.candidates,
        stats.written,
        grid.chunk_count()
    );
    Ok(stats)
}

/// Validates flat arrays, then voxelizes. Nothing is written when
/// validation fails.
pub fn voxelize_arrays(
    grid: &mut VoxelGrid,
    positions: &[f64],
    indices: &[u32],
    target: VoxelType,
) -> Result<VoxelizeStats, MeshError> {
    let mesh = TriangleMesh::from_flat(positions, indices)?;
    voxelize_mesh(grid, &mesh, target)
}
