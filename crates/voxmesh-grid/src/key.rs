use serde::{Deserialize, Serialize};
use voxmesh_chunk::CHUNK_SIZE;

use crate::VoxelPos;

const N: i32 = CHUNK_SIZE as i32;

/// Chunk-space coordinate: voxel coordinate floor-divided by the chunk edge.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ChunkKey {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkKey {
    /// Lowest key owning `i32` voxels.
    pub const MIN: ChunkKey = ChunkKey::new(i32::MIN / N, i32::MIN / N, i32::MIN / N);
    /// Highest key owning `i32` voxels.
    pub const MAX: ChunkKey = ChunkKey::new(i32::MAX / N, i32::MAX / N, i32::MAX / N);

    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Key of the chunk owning voxel `(vx, vy, vz)`. Rounds toward negative
    /// infinity, so voxel -1 lives in chunk -1.
    #[inline]
    pub fn of_voxel(vx: i32, vy: i32, vz: i32) -> Self {
        Self {
            cx: vx.div_euclid(N),
            cy: vy.div_euclid(N),
            cz: vz.div_euclid(N),
        }
    }

    /// Neighboring key, `None` if it would leave `MIN..=MAX`.
    #[inline]
    pub fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        let k = Self {
            cx: self.cx.checked_add(dx)?,
            cy: self.cy.checked_add(dy)?,
            cz: self.cz.checked_add(dz)?,
        };
        k.in_range().then_some(k)
    }

    /// True if every voxel of this chunk has an `i32` coordinate.
    #[inline]
    pub fn in_range(self) -> bool {
        let ok = |c: i32| (Self::MIN.cx..=Self::MAX.cx).contains(&c);
        ok(self.cx) && ok(self.cy) && ok(self.cz)
    }

    /// Global coordinate of this chunk's `(0,0,0)` voxel. Exact for keys in
    /// `MIN..=MAX`, saturating outside.
    #[inline]
    pub fn base_voxel(self) -> VoxelPos {
        (
            self.cx.saturating_mul(N),
            self.cy.saturating_mul(N),
            self.cz.saturating_mul(N),
        )
    }

    #[inline]
    pub fn min(self, other: ChunkKey) -> ChunkKey {
        ChunkKey::new(
            self.cx.min(other.cx),
            self.cy.min(other.cy),
            self.cz.min(other.cz),
        )
    }

    #[inline]
    pub fn max(self, other: ChunkKey) -> ChunkKey {
        ChunkKey::new(
            self.cx.max(other.cx),
            self.cy.max(other.cy),
            self.cz.max(other.cz),
        )
    }
}

/// Splits a global voxel coordinate into its chunk key and in-chunk offset.
#[inline]
pub fn split_voxel(vx: i32, vy: i32, vz: i32) -> (ChunkKey, (usize, usize, usize)) {
    (
        ChunkKey::of_voxel(vx, vy, vz),
        (
            vx.rem_euclid(N) as usize,
            vy.rem_euclid(N) as usize,
            vz.rem_euclid(N) as usize,
        ),
    )
}

impl From<(i32, i32, i32)> for ChunkKey {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkKey> for (i32, i32, i32) {
    fn from(value: ChunkKey) -> Self {
        (value.cx, value.cy, value.cz)
    }
}
