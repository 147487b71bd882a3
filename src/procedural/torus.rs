use super::utils;
use super::RenderMesh;
use glamx::Vec3;
use std::f32::consts::TAU;

/// Generates a torus lying on the `xy` plane, centered at the origin.
///
/// # Arguments
/// * `radius` - distance from the center of the torus to the center of the tube
/// * `tube` - radius of the tube
/// * `radial_segments` - number of subdivisions around the tube
/// * `tubular_segments` - number of subdivisions along the tube
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> RenderMesh {
    torus_arc(radius, tube, radial_segments, tubular_segments, TAU)
}

/// Generates a portion of a torus, sweeping `arc` radians counterclockwise from `+x`.
///
/// An `arc` of `π` gives an open half-ring spanning the `y >= 0` half-plane.
/// The mesh has `(radial_segments + 1) * (tubular_segments + 1)` vertices.
pub fn torus_arc(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
    arc: f32,
) -> RenderMesh {
    let radial_segments = radial_segments.max(3);
    let tubular_segments = tubular_segments.max(1);
    let mut coords = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Rows follow the ring, columns go around the tube.
    for row in 0..=tubular_segments {
        let u = row as f32 / tubular_segments as f32 * arc;
        let (sin_u, cos_u) = u.sin_cos();
        let center = Vec3::new(radius * cos_u, radius * sin_u, 0.0);

        for col in 0..=radial_segments {
            let v = col as f32 / radial_segments as f32 * TAU;
            let (sin_v, cos_v) = v.sin_cos();
            let ring = radius + tube * cos_v;
            let p = Vec3::new(ring * cos_u, ring * sin_u, tube * sin_v);

            coords.push(p);
            normals.push((p - center).normalize_or_zero());
        }
    }

    utils::push_grid_indices(
        0,
        radial_segments,
        tubular_segments,
        |_| (false, false),
        &mut indices,
    );

    RenderMesh::new(coords, Some(normals), None, Some(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn vertex_count_follows_the_grid() {
        assert_eq!(torus(1.25, 0.25, 16, 40).num_vertices(), 17 * 41);
        assert_eq!(torus_arc(1.25, 0.35, 16, 20, PI).num_vertices(), 17 * 21);
    }

    #[test]
    fn half_torus_covers_the_upper_half_plane() {
        let mesh = torus_arc(1.25, 0.35, 16, 20, PI);
        let (lo, hi) = mesh.aabb().unwrap();
        assert!(lo.y > -1.0e-5);
        assert!((hi.y - 1.6).abs() < 1.0e-2);
        assert!((lo.x + 1.6).abs() < 1.0e-2);
    }

    #[test]
    fn faces_point_away_from_the_tube_axis() {
        let mesh = torus(1.25, 0.25, 8, 12);
        let normals = mesh.normals.as_ref().unwrap();
        for t in mesh.indices.iter() {
            let [a, b, c] = t.map(|i| mesh.coords[i as usize]);
            let n = (b - a).cross(c - a);
            assert!(n.dot(normals[t[0] as usize]) > 0.0);
        }
    }
}
