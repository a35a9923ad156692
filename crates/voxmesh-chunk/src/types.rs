use serde::{Deserialize, Serialize};

// One byte per cell. Only EMPTY, SOLID and SURFACE are interpreted by the
// core; any other value is an application tag stored as-is.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[repr(transparent)]
pub struct VoxelType(pub u8);

impl VoxelType {
    pub const EMPTY: VoxelType = VoxelType(0);
    pub const SOLID: VoxelType = VoxelType(1);
    pub const SURFACE: VoxelType = VoxelType(2);

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    #[inline]
    pub const fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::EMPTY => "empty",
            Self::SOLID => "solid",
            Self::SURFACE => "surface",
            _ => "tag",
        }
    }
}

impl From<u8> for VoxelType {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<VoxelType> for u8 {
    fn from(value: VoxelType) -> Self {
        value.0
    }
}
