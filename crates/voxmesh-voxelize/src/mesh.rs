use thiserror::Error;
use voxmesh_geom::{Aabb, Vec3};

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("vertex array length {0} is not a multiple of 3")]
    VertexShape(usize),
    #[error("index array length {0} is not a multiple of 3")]
    IndexShape(usize),
    #[error("triangle {triangle} references vertex {index} but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
    #[error("triangle {triangle} lies outside the addressable voxel range at this cell size")]
    OutOfGridRange { triangle: usize },
}

/// Validated triangle soup. Construction checks shapes, index ranges and
/// finiteness up front so passes never see malformed input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::NonFiniteVertex(i));
        }
        let vertex_count = vertices.len();
        for (t, tri) in triangles.iter().enumerate() {
            for &index in tri {
                if index as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        triangle: t,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Builds a mesh from flat `Nx3` coordinate and `Mx3` index arrays.
    pub fn from_flat(positions: &[f64], indices: &[u32]) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::VertexShape(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexShape(indices.len()));
        }
        let vertices = positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();
        Self::new(vertices, triangles)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of triangle `i`, `None` past the end.
    #[inline]
    pub fn triangle(&self, i: usize) -> Option<[Vec3; 3]> {
        self.triangles.get(i).map(|t| self.corners(t))
    }

    /// Triangles in index order.
    pub fn iter_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles.iter().map(|t| self.corners(t))
    }

    // Indices were range-checked at construction.
    #[inline]
    fn corners(&self, &[a, b, c]: &[u32; 3]) -> [Vec3; 3] {
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Axis-aligned box `min..max` with outward-facing, counter-clockwise
    /// triangles (12 triangles, 8 vertices).
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let v = vec![
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        let t = vec![
            // -Z
            [0, 2, 1],
            [0, 3, 2],
            // +Z
            [4, 5, 6],
            [4, 6, 7],
            // -Y
            [0, 1, 5],
            [0, 5, 4],
            // +Y
            [3, 7, 6],
            [3, 6, 2],
            // -X
            [0, 4, 7],
            [0, 7, 3],
            // +X
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self {
            vertices: v,
            triangles: t,
        }
    }
}
