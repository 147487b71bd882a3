use super::RenderMesh;
use glamx::Vec3;

/// Generates a cuboid mesh with the specified extents.
///
/// The cuboid is centered at the origin and axis-aligned. Each face has its own four
/// vertices so that normals stay sharp along the edges.
///
/// # Arguments
/// * `extents` - the full size of the cuboid along each axis
///
/// # Example
/// ```
/// # use memphis3d::procedural::cuboid;
/// # use glamx::Vec3;
/// let slab = cuboid(Vec3::new(1.25, 0.35, 1.25));
/// assert_eq!(slab.num_vertices(), 24);
/// assert_eq!(slab.num_triangles(), 12);
/// ```
pub fn cuboid(extents: Vec3) -> RenderMesh {
    let half = extents / 2.0;
    let mut coords = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(12);

    // (normal, u, v) with u × v = normal, so each quad winds counterclockwise seen from outside.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    for (n, u, v) in faces {
        let base = coords.len() as u32;
        let center = n * half;
        let u = u * half;
        let v = v * half;

        coords.push(center - u - v);
        coords.push(center + u - v);
        coords.push(center + u + v);
        coords.push(center - u + v);
        normals.extend_from_slice(&[n; 4]);

        indices.push([base, base + 1, base + 2]);
        indices.push([base, base + 2, base + 3]);
    }

    RenderMesh::new(coords, Some(normals), None, Some(indices))
}
