use std::time::Instant;

use voxmesh_grid::{NEIGHBORS_6, VoxelGrid, VoxelPos, VoxelType, neighbor};

/// True if any 6-neighbor of `v` is EMPTY. Neighbors in chunks that do not
/// exist, or past the `i32` range, read as EMPTY.
#[inline]
pub fn is_boundary_voxel(grid: &VoxelGrid, v: VoxelPos) -> bool {
    NEIGHBORS_6
        .iter()
        .any(|&d| neighbor(v, d).is_none_or(|nb| grid.get(nb).is_empty()))
}

// Occupied voxels with an EMPTY neighbor, optionally restricted to one type.
fn boundary_voxels(grid: &VoxelGrid, only: Option<VoxelType>) -> Vec<VoxelPos> {
    let mut out = Vec::new();
    for (key, chunk) in grid.iter_chunks() {
        if chunk.is_empty() {
            continue;
        }
        let (bx, by, bz) = key.base_voxel();
        for (x, y, z, ty) in chunk.iter_non_empty() {
            if only.is_some_and(|t| t != ty) {
                continue;
            }
            let v = (bx + x as i32, by + y as i32, bz + z as i32);
            if is_boundary_voxel(grid, v) {
                out.push(v);
            }
        }
    }
    out
}

/// Reclassifies every SOLID voxel that touches EMPTY space as `value`.
/// Candidates are collected before any write. Returns how many changed.
pub fn mark_surface(grid: &mut VoxelGrid, value: VoxelType) -> usize {
    let t0 = Instant::now();
    let marked = boundary_voxels(grid, Some(VoxelType::SOLID));
    for v in &marked {
        grid.set(*v, value);
    }
    log::info!(
        target: "perf",
        "ms={} mark_surface marked={} value={}",
        t0.elapsed().as_millis(),
        marked.len(),
        value.name()
    );
    marked.len()
}

/// Resets every voxel of type `ty` to EMPTY across the grid. Emptied chunks
/// are kept.
pub fn clear_by_type(grid: &mut VoxelGrid, ty: VoxelType) -> usize {
    let n = grid.clear_by_type(ty);
    log::debug!("clear_by_type {} cleared={}", ty.name(), n);
    n
}

/// Read-only surface query: every occupied voxel with at least one EMPTY
/// 6-neighbor, sorted.
pub fn extract_surface(grid: &VoxelGrid) -> Vec<VoxelPos> {
    let mut out = boundary_voxels(grid, None);
    out.sort_unstable();
    out
}
