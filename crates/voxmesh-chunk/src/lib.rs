//! Dense voxel chunk storage with an O(1) occupancy counter.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod types;

pub use types::VoxelType;

/// Edge length of a chunk in voxels.
pub const CHUNK_SIZE: usize = 16;
/// Number of voxels in a chunk (`CHUNK_SIZE^3`).
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk payload has {got} bytes, expected {expected}")]
    PayloadLength { got: usize, expected: usize },
}

/// `N^3` voxel bytes plus a running count of non-empty cells.
///
/// Indexing is `x + y*N + z*N^2`, so a linear walk over the buffer is the
/// z-major, then y, then x scan order used by [`VoxelChunk::iter_non_empty`].
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelChunk {
    voxels: Box<[u8]>,
    non_empty: u32,
}

impl VoxelChunk {
    pub fn new() -> Self {
        Self {
            voxels: vec![VoxelType::EMPTY.raw(); CHUNK_VOLUME].into_boxed_slice(),
            non_empty: 0,
        }
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < CHUNK_SIZE && y < CHUNK_SIZE && z < CHUNK_SIZE);
        x + y * CHUNK_SIZE + z * CHUNK_SIZE * CHUNK_SIZE
    }

    #[inline]
    pub fn coords(idx: usize) -> (usize, usize, usize) {
        (
            idx % CHUNK_SIZE,
            (idx / CHUNK_SIZE) % CHUNK_SIZE,
            idx / (CHUNK_SIZE * CHUNK_SIZE),
        )
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelType {
        VoxelType(self.voxels[Self::idx(x, y, z)])
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: VoxelType) {
        let slot = &mut self.voxels[Self::idx(x, y, z)];
        let was_empty = VoxelType(*slot).is_empty();
        *slot = value.raw();
        match (was_empty, value.is_empty()) {
            (true, false) => self.non_empty += 1,
            (false, true) => self.non_empty -= 1,
            _ => {}
        }
    }

    pub fn fill(&mut self, value: VoxelType) {
        self.voxels.fill(value.raw());
        self.non_empty = if value.is_empty() {
            0
        } else {
            CHUNK_VOLUME as u32
        };
    }

    #[inline]
    pub fn clear(&mut self) {
        self.fill(VoxelType::EMPTY);
    }

    #[inline]
    pub fn non_empty_count(&self) -> usize {
        self.non_empty as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.non_empty == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.non_empty as usize == CHUNK_VOLUME
    }

    pub fn count_of(&self, ty: VoxelType) -> usize {
        self.voxels.iter().filter(|&&v| v == ty.raw()).count()
    }

    /// Rewrites every `from` cell to `to`, keeping the counter exact.
    /// Returns the number of cells rewritten.
    pub fn replace(&mut self, from: VoxelType, to: VoxelType) -> usize {
        if from == to {
            return 0;
        }
        let mut n = 0usize;
        for v in self.voxels.iter_mut() {
            if *v == from.raw() {
                *v = to.raw();
                n += 1;
            }
        }
        match (from.is_empty(), to.is_empty()) {
            (true, false) => self.non_empty += n as u32,
            (false, true) => self.non_empty -= n as u32,
            _ => {}
        }
        n
    }

    /// Non-empty cells as `(x, y, z, type)` in buffer order. The returned
    /// iterator is `Clone`, and calling this again starts a fresh scan.
    pub fn iter_non_empty(&self) -> NonEmptyVoxels<'_> {
        NonEmptyVoxels {
            voxels: &self.voxels,
            pos: 0,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.voxels
    }

    /// Rebuilds a chunk from its raw bytes. The counter is recomputed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChunkError> {
        if bytes.len() != CHUNK_VOLUME {
            return Err(ChunkError::PayloadLength {
                got: bytes.len(),
                expected: CHUNK_VOLUME,
            });
        }
        let non_empty = bytes.iter().filter(|&&b| b != VoxelType::EMPTY.raw()).count() as u32;
        Ok(Self {
            voxels: bytes.to_vec().into_boxed_slice(),
            non_empty,
        })
    }

    pub fn to_payload(&self) -> ChunkPayload {
        ChunkPayload {
            voxels: self.voxels.to_vec(),
            non_empty: self.non_empty,
        }
    }

    pub fn from_payload(payload: &ChunkPayload) -> Result<Self, ChunkError> {
        let chunk = Self::from_bytes(&payload.voxels)?;
        if chunk.non_empty != payload.non_empty {
            log::warn!(
                "chunk payload count hint {} disagrees with data ({}); using data",
                payload.non_empty,
                chunk.non_empty
            );
        }
        Ok(chunk)
    }
}

impl Default for VoxelChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VoxelChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelChunk")
            .field("non_empty", &self.non_empty)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct NonEmptyVoxels<'a> {
    voxels: &'a [u8],
    pos: usize,
}

impl Iterator for NonEmptyVoxels<'_> {
    type Item = (usize, usize, usize, VoxelType);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.voxels.len() {
            let i = self.pos;
            self.pos += 1;
            let v = VoxelType(self.voxels[i]);
            if v.is_occupied() {
                let (x, y, z) = VoxelChunk::coords(i);
                return Some((x, y, z, v));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.voxels.len() - self.pos))
    }
}

/// Logical chunk payload handed to an external codec: the raw voxel bytes
/// and the non-empty count as a hint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub voxels: Vec<u8>,
    pub non_empty: u32,
}
