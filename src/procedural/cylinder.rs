use super::utils;
use super::RenderMesh;
use glamx::Vec3;

/// Generates a (possibly tapered) cylinder mesh.
///
/// The cylinder is centered at the origin, oriented along the Y axis, and extends from
/// `y = -height / 2` to `y = +height / 2`. A cap is added at each end with a non-zero radius.
///
/// # Arguments
/// * `radius_top` - The radius of the upper end
/// * `radius_bottom` - The radius of the lower end
/// * `height` - The height of the cylinder
/// * `radial_segments` - Number of subdivisions around the circumference
/// * `height_segments` - Number of subdivisions along the height
///
/// The side is a `(radial_segments + 1) × (height_segments + 1)` grid of vertices
/// (the seam is duplicated), and each cap adds `2 * radial_segments + 1` vertices.
///
/// # Example
/// ```
/// # use memphis3d::procedural::cylinder;
/// let tube = cylinder(0.75, 0.75, 3.0, 26, 20);
/// assert_eq!(tube.num_vertices(), 27 * 21 + 2 * 53);
/// ```
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> RenderMesh {
    let radial_segments = radial_segments.max(3);
    let height_segments = height_segments.max(1);
    let half_height = height / 2.0;
    let dtheta = std::f32::consts::TAU / radial_segments as f32;
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    let mut coords = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    /*
     * Side.
     */
    for row in 0..=height_segments {
        let v = row as f32 / height_segments as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let y = half_height - v * height;

        for col in 0..=radial_segments {
            let theta = col as f32 * dtheta;
            let (sin, cos) = theta.sin_cos();
            coords.push(Vec3::new(radius * sin, y, radius * cos));
            normals.push(Vec3::new(sin, slope, cos).normalize());
        }
    }

    utils::push_grid_indices(
        0,
        radial_segments,
        height_segments,
        |_| (false, false),
        &mut indices,
    );

    /*
     * Caps.
     */
    if radius_top > 0.0 {
        push_cap(
            radius_top,
            half_height,
            true,
            radial_segments,
            &mut coords,
            &mut normals,
            &mut indices,
        );
    }

    if radius_bottom > 0.0 {
        push_cap(
            radius_bottom,
            -half_height,
            false,
            radial_segments,
            &mut coords,
            &mut normals,
            &mut indices,
        );
    }

    RenderMesh::new(coords, Some(normals), None, Some(indices))
}

/// Generates a cone mesh pointing toward `+Y`.
///
/// The cone is centered at the origin: its base lies at `y = -height / 2` and its apex at
/// `y = +height / 2`. It has a single height segment and a base cap.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> RenderMesh {
    cylinder(0.0, radius, height, radial_segments, 1)
}

// One center vertex per segment keeps the cap triangles independent, so the
// per-face "pixel" coloring never bleeds across segments.
fn push_cap(
    radius: f32,
    y: f32,
    top: bool,
    radial_segments: u32,
    coords: &mut Vec<Vec3>,
    normals: &mut Vec<Vec3>,
    indices: &mut Vec<[u32; 3]>,
) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let dtheta = std::f32::consts::TAU / radial_segments as f32;
    let center_start = coords.len() as u32;

    for _ in 0..radial_segments {
        coords.push(Vec3::new(0.0, y, 0.0));
        normals.push(normal);
    }

    let ring_start = coords.len() as u32;

    for i in 0..=radial_segments {
        let (sin, cos) = (i as f32 * dtheta).sin_cos();
        coords.push(Vec3::new(radius * sin, y, radius * cos));
        normals.push(normal);
    }

    for i in 0..radial_segments {
        let c = center_start + i;
        let r = ring_start + i;

        if top {
            indices.push([r, r + 1, c]);
        } else {
            indices.push([r + 1, r, c]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outward(mesh: &RenderMesh) -> bool {
        // Every face normal must agree with the stored normals of its vertices.
        let normals = mesh.normals.as_ref().unwrap();
        mesh.indices.iter().all(|t| {
            let [a, b, c] = t.map(|i| mesh.coords[i as usize]);
            let n = (b - a).cross(c - a);
            n.length_squared() < 1.0e-12 || n.dot(normals[t[0] as usize]) > 0.0
        })
    }

    #[test]
    fn cylinder_spans_its_height() {
        let mesh = cylinder(1.1, 1.1, 0.75, 35, 5);
        let (lo, hi) = mesh.aabb().unwrap();
        assert!((lo.y + 0.375).abs() < 1.0e-6);
        assert!((hi.y - 0.375).abs() < 1.0e-6);
        assert!((hi.x - 1.1).abs() < 1.0e-2);
    }

    #[test]
    fn faces_point_outward() {
        assert!(outward(&cylinder(0.75, 0.75, 3.0, 26, 20)));
        assert!(outward(&cone(1.25, 2.25, 38)));
    }

    #[test]
    fn cone_has_no_top_cap() {
        let mesh = cone(1.25, 2.25, 38);
        assert_eq!(mesh.num_vertices(), 39 * 2 + 38 + 39);
        assert_eq!(mesh.num_triangles(), 38 * 2 + 38);
    }
}
