use voxmesh_geom::{Aabb, Vec3};

use crate::{GridError, VOXEL_LIMIT, VoxelPos};

/// World-space <-> voxel-index conversion for a fixed cell size and origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    cell_size: f64,
    origin: Vec3,
}

impl CoordinateMapper {
    pub fn new(cell_size: f64, origin: Vec3) -> Result<Self, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        if !origin.is_finite() {
            return Err(GridError::NonFiniteOrigin);
        }
        Ok(Self { cell_size, origin })
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Continuous voxel-space position: `(p - origin) / cell_size`. Voxel
    /// `v` owns the half-open unit cube `[v, v + 1)` in this space.
    #[inline]
    pub fn to_voxel_space(&self, p: Vec3) -> Vec3 {
        (p - self.origin) / self.cell_size
    }

    /// `floor((p - origin) / cell_size)` per component. Saturates at the
    /// `i32` limits; use [`CoordinateMapper::try_world_to_voxel`] to detect
    /// that.
    #[inline]
    pub fn world_to_voxel(&self, p: Vec3) -> VoxelPos {
        let q = self.to_voxel_space(p);
        (
            q.x.floor() as i32,
            q.y.floor() as i32,
            q.z.floor() as i32,
        )
    }

    /// Like `world_to_voxel`, but `None` when the voxel has no `i32` index.
    #[inline]
    pub fn try_world_to_voxel(&self, p: Vec3) -> Option<VoxelPos> {
        let q = self.to_voxel_space(p);
        Some((
            floor_within(q.x, i32::MIN, i32::MAX)?,
            floor_within(q.y, i32::MIN, i32::MAX)?,
            floor_within(q.z, i32::MIN, i32::MAX)?,
        ))
    }

    /// Minimum corner of voxel `v`.
    #[inline]
    pub fn voxel_to_world(&self, v: VoxelPos) -> Vec3 {
        self.origin + Vec3::new(v.0 as f64, v.1 as f64, v.2 as f64) * self.cell_size
    }

    #[inline]
    pub fn voxel_center(&self, v: VoxelPos) -> Vec3 {
        self.voxel_to_world(v) + Vec3::splat(self.cell_size * 0.5)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        Vec3::splat(self.cell_size * 0.5)
    }

    /// World-space box covering voxels `min..=max`.
    pub fn voxel_box_to_world(&self, min: VoxelPos, max: VoxelPos) -> Aabb {
        let end = Vec3::new(max.0 as f64 + 1.0, max.1 as f64 + 1.0, max.2 as f64 + 1.0);
        Aabb::new(self.voxel_to_world(min), self.origin + end * self.cell_size)
    }

    /// Inclusive range of voxels owning some point of the voxel-space box
    /// `q_min..=q_max`. `None` if it reaches past [`VOXEL_LIMIT`].
    pub fn voxel_range(&self, q_min: Vec3, q_max: Vec3) -> Option<(VoxelPos, VoxelPos)> {
        let l = VOXEL_LIMIT;
        Some((
            (
                floor_within(q_min.x, -l, l)?,
                floor_within(q_min.y, -l, l)?,
                floor_within(q_min.z, -l, l)?,
            ),
            (
                floor_within(q_max.x, -l, l)?,
                floor_within(q_max.y, -l, l)?,
                floor_within(q_max.z, -l, l)?,
            ),
        ))
    }
}

#[inline]
fn floor_within(q: f64, lo: i32, hi: i32) -> Option<i32> {
    let f = q.floor();
    // NaN fails both comparisons
    (f >= lo as f64 && f <= hi as f64).then_some(f as i32)
}
