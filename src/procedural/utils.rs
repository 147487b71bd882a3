//! Utilities useful for various generations tasks.

use glamx::Vec3;

/// Given four corner points, pushes to two counterclockwise triangles to `out`.
///
/// # Arguments:
/// * `ul` - the up-left point.
/// * `ur` - the up-right point.
/// * `dl` - the down-left point.
/// * `dr` - the down-right point.
#[inline]
pub fn push_rectangle_indices(ul: u32, ur: u32, dl: u32, dr: u32, out: &mut Vec<[u32; 3]>) {
    out.push([ul, dl, ur]);
    out.push([dl, dr, ur]);
}

/// Pushes the faces of a `ncols × nrows` grid of quads whose vertices are stored row by row,
/// with `ncols + 1` vertices per row, starting at `base`.
///
/// Rows go "down" and columns go "right": with this layout the triangles are
/// counterclockwise when seen from the side the grid was laid out for.
/// `skip` is called with the row index and returns which of the two triangles of
/// each quad of that row must be dropped (used for degenerate pole rows).
#[inline]
pub fn push_grid_indices<F: Fn(u32) -> (bool, bool)>(
    base: u32,
    ncols: u32,
    nrows: u32,
    skip: F,
    out: &mut Vec<[u32; 3]>,
) {
    let stride = ncols + 1;

    for row in 0..nrows {
        let (skip_upper, skip_lower) = skip(row);

        for col in 0..ncols {
            let ul = base + row * stride + col;
            let ur = ul + 1;
            let dl = ul + stride;
            let dr = dl + 1;

            if !skip_upper {
                out.push([ul, dl, ur]);
            }

            if !skip_lower {
                out.push([dl, dr, ur]);
            }
        }
    }
}

/// Computes the normals of a set of vertices.
///
/// Each vertex normal is the normalized mean of the normals of the faces sharing it.
/// Vertices not referenced by any face get a zero normal.
#[inline]
pub fn compute_normals(coordinates: &[Vec3], faces: &[[u32; 3]], normals: &mut Vec<Vec3>) {
    normals.clear();
    normals.resize(coordinates.len(), Vec3::ZERO);

    for f in faces.iter() {
        let edge1 = coordinates[f[1] as usize] - coordinates[f[0] as usize];
        let edge2 = coordinates[f[2] as usize] - coordinates[f[0] as usize];
        let normal = edge1.cross(edge2).normalize_or_zero();

        normals[f[0] as usize] += normal;
        normals[f[1] as usize] += normal;
        normals[f[2] as usize] += normal;
    }

    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_two_triangles_per_cell() {
        let mut out = Vec::new();
        push_grid_indices(0, 3, 2, |_| (false, false), &mut out);
        assert_eq!(out.len(), 12);
        assert_eq!(out[0], [0, 4, 1]);
        assert_eq!(out[1], [4, 5, 1]);
    }

    #[test]
    fn grid_rows_can_drop_degenerate_triangles() {
        let mut out = Vec::new();
        push_grid_indices(0, 4, 3, |row| (row == 0, row == 2), &mut out);
        assert_eq!(out.len(), 4 * 3 * 2 - 8);
    }

    #[test]
    fn flat_quad_normals_point_up() {
        let coords = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let mut faces = Vec::new();
        // Seen from above, +x is right and +z is down.
        push_rectangle_indices(0, 1, 2, 3, &mut faces);
        let mut normals = Vec::new();
        compute_normals(&coords, &faces, &mut normals);
        for n in normals {
            assert!((n - Vec3::Y).length() < 1.0e-6);
        }
    }
}
