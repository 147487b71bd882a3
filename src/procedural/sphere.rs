use super::utils;
use super::RenderMesh;
use glamx::Vec3;
use std::f32::consts::{PI, TAU};

/// Generates a UV sphere centered at the origin.
///
/// # Arguments
/// * `radius` - the sphere radius
/// * `width_segments` - number of subdivisions around the `y` axis (longitude)
/// * `height_segments` - number of subdivisions from top to bottom (latitude)
///
/// The mesh has `(width_segments + 1) * (height_segments + 1)` vertices.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> RenderMesh {
    sphere_sector(radius, width_segments, height_segments, 0.0, TAU)
}

/// Generates a sector of a UV sphere, sweeping the azimuth from `phi_start` over `phi_length`.
///
/// The azimuth is measured around the `y` axis, starting at `-x` and turning toward `+z`.
/// A `phi_length` of `π` gives an open half-sphere whose flat side faces `-z`.
pub fn sphere_sector(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    phi_start: f32,
    phi_length: f32,
) -> RenderMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut coords = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for row in 0..=height_segments {
        let theta = row as f32 / height_segments as f32 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for col in 0..=width_segments {
            let phi = phi_start + col as f32 / width_segments as f32 * phi_length;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let dir = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);

            coords.push(dir * radius);
            normals.push(dir.normalize_or_zero());
        }
    }

    // The first and last rows touch a pole, where one triangle of each quad collapses.
    utils::push_grid_indices(
        0,
        width_segments,
        height_segments,
        |row| (row == 0, row == height_segments - 1),
        &mut indices,
    );

    RenderMesh::new(coords, Some(normals), None, Some(indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_follows_the_grid() {
        assert_eq!(sphere(0.75, 22, 22).num_vertices(), 23 * 23);
        assert_eq!(sphere_sector(0.75, 15, 15, 0.0, PI).num_vertices(), 16 * 16);
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let mesh = sphere(0.75, 22, 22);
        assert!(mesh
            .coords
            .iter()
            .all(|p| (p.length() - 0.75).abs() < 1.0e-5));
    }

    #[test]
    fn half_sphere_stays_on_one_side() {
        let mesh = sphere_sector(0.75, 15, 15, 0.0, PI);
        assert!(mesh.coords.iter().all(|p| p.z >= -1.0e-5));
    }

    #[test]
    fn faces_point_outward() {
        let mesh = sphere(1.0, 12, 8);
        for t in mesh.indices.iter() {
            let [a, b, c] = t.map(|i| mesh.coords[i as usize]);
            let n = (b - a).cross(c - a);
            assert!(n.length() > 0.0);
            assert!(n.dot(a + b + c) > 0.0);
        }
    }
}
