use crate::Vec3;

/// Triangle/box overlap via the separating axis theorem.
///
/// Candidate axes are the three box face normals, the triangle face normal
/// and the nine cross products of each box axis with each triangle edge.
///
/// Along the box axes the box is half-open, `[center - half, center + half)`,
/// so a triangle lying exactly on a shared face belongs to the box above it,
/// the same cell `floor` assigns its points to. On the remaining axes
/// projections that merely touch are not separating. Axes of zero length
/// (degenerate triangles, edges parallel to a box axis) are skipped instead
/// of being normalized.
pub fn tri_box_overlap(center: Vec3, half: Vec3, tri: [Vec3; 3]) -> bool {
    // Work in the box frame so the box is centered at the origin.
    let v = [tri[0] - center, tri[1] - center, tri[2] - center];

    // Box face normals: plain interval checks.
    for axis in 0..3 {
        let (a, b, c) = match axis {
            0 => (v[0].x, v[1].x, v[2].x),
            1 => (v[0].y, v[1].y, v[2].y),
            _ => (v[0].z, v[1].z, v[2].z),
        };
        let h = match axis {
            0 => half.x,
            1 => half.y,
            _ => half.z,
        };
        if a.min(b).min(c) >= h || a.max(b).max(c) < -h {
            return false;
        }
    }

    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

    if separated_on(edges[0].cross(edges[1]), &v, half) {
        return false;
    }

    for edge in edges {
        for unit in [Vec3::X, Vec3::Y, Vec3::Z] {
            if separated_on(unit.cross(edge), &v, half) {
                return false;
            }
        }
    }
    true
}

#[inline]
fn separated_on(axis: Vec3, v: &[Vec3; 3], half: Vec3) -> bool {
    if axis.is_zero() {
        return false;
    }
    let p0 = axis.dot(v[0]);
    let p1 = axis.dot(v[1]);
    let p2 = axis.dot(v[2]);
    let r = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
    p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r
}

/// Unit normal of the counter-clockwise triangle `a, b, c`.
/// Returns `None` when the triangle has zero area.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let n = (b - a).cross(c - a);
    let len = n.length();
    if len > 0.0 && len.is_finite() {
        Some(n / len)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Vec3 = Vec3::new(0.5, 0.5, 0.5);

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [Vec3; 3] {
        [a.into(), b.into(), c.into()]
    }

    #[test]
    fn triangle_inside_box_overlaps() {
        let t = tri([0.1, 0.1, 0.1], [0.2, 0.1, 0.1], [0.1, 0.2, 0.1]);
        assert!(tri_box_overlap(Vec3::ZERO, HALF, t));
    }

    #[test]
    fn triangle_far_away_is_separated() {
        let t = tri([5.0, 5.0, 5.0], [6.0, 5.0, 5.0], [5.0, 6.0, 5.0]);
        assert!(!tri_box_overlap(Vec3::ZERO, HALF, t));
    }

    #[test]
    fn large_triangle_cutting_through_box_overlaps() {
        // No vertex is inside the box but the plane z = 0 slices it.
        let t = tri([-10.0, -10.0, 0.0], [10.0, -10.0, 0.0], [0.0, 10.0, 0.0]);
        assert!(tri_box_overlap(Vec3::ZERO, HALF, t));
    }

    #[test]
    fn diagonal_corner_miss_needs_edge_axes() {
        // Bounding boxes overlap but the hypotenuse passes beyond the corner.
        let t = tri([0.2, 1.0, 0.0], [1.0, 0.2, 0.0], [1.0, 1.0, 0.0]);
        assert!(!tri_box_overlap(Vec3::ZERO, HALF, t));
    }

    #[test]
    fn lower_face_is_owned_upper_face_is_not() {
        let on_lower = tri([-0.5, -0.2, -0.2], [-0.5, 0.2, -0.2], [-0.5, 0.0, 0.2]);
        assert!(tri_box_overlap(Vec3::ZERO, HALF, on_lower));
        let on_upper = tri([0.5, -0.2, -0.2], [0.5, 0.2, -0.2], [0.5, 0.0, 0.2]);
        assert!(!tri_box_overlap(Vec3::ZERO, HALF, on_upper));
        // the same triangle belongs to the next box up
        assert!(tri_box_overlap(Vec3::X, HALF, on_upper));
        let inside = tri([0.4999, -0.2, -0.2], [0.4999, 0.2, -0.2], [0.4999, 0.0, 0.2]);
        assert!(tri_box_overlap(Vec3::ZERO, HALF, inside));
    }

    #[test]
    fn spanning_triangle_reaches_the_upper_box() {
        // a triangle crossing the shared face overlaps both boxes
        let t = tri([0.2, -0.2, 0.0], [0.8, -0.2, 0.0], [0.5, 0.2, 0.0]);
        assert!(tri_box_overlap(Vec3::ZERO, HALF, t));
        assert!(tri_box_overlap(Vec3::X, HALF, t));
    }

    #[test]
    fn degenerate_triangles_do_not_panic() {
        let point = tri([0.1, 0.1, 0.1], [0.1, 0.1, 0.1], [0.1, 0.1, 0.1]);
        assert!(tri_box_overlap(Vec3::ZERO, HALF, point));
        let far_point = tri([3.0, 0.0, 0.0], [3.0, 0.0, 0.0], [3.0, 0.0, 0.0]);
        assert!(!tri_box_overlap(Vec3::ZERO, HALF, far_point));
        let segment = tri([-2.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert!(tri_box_overlap(Vec3::ZERO, HALF, segment));
    }

    #[test]
    fn normal_follows_winding() {
        let n = triangle_normal(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(n, Some(Vec3::Z));
        let flipped = triangle_normal(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(flipped, Some(-Vec3::Z));
        assert_eq!(triangle_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0), None);
    }
}
