use super::utils;
use crate::color::Color;
use glamx::Vec3;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Geometric description of a mesh.
pub struct RenderMesh {
    /// Coordinates of the mesh vertices.
    pub coords: Vec<Vec3>,
    /// Coordinates of the mesh normals.
    pub normals: Option<Vec<Vec3>>,
    /// Per-vertex colors, multiplied with the material color when the material asks for it.
    pub colors: Option<Vec<Color>>,
    /// Index buffer of the mesh.
    pub indices: Vec<[u32; 3]>,
}

impl RenderMesh {
    /// Creates a new `RenderMesh`.
    ///
    /// If no `indices` is provided, trivial, sequential indices are generated.
    pub fn new(
        coords: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        colors: Option<Vec<Color>>,
        indices: Option<Vec<[u32; 3]>>,
    ) -> RenderMesh {
        // generate trivial indices
        let indices = indices.unwrap_or_else(|| {
            (0..coords.len() / 3)
                .map(|i| [i as u32 * 3, i as u32 * 3 + 1, i as u32 * 3 + 2])
                .collect()
        });

        RenderMesh {
            coords,
            normals,
            colors,
            indices,
        }
    }

    /// Whether or not this triangle mesh has per-vertex colors.
    #[inline]
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// The number of vertices on this mesh.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.coords.len()
    }

    /// The number of triangles on this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// Translates each vertex of this mesh.
    #[inline]
    pub fn translate_by(&mut self, t: Vec3) {
        for c in self.coords.iter_mut() {
            *c += t;
        }
    }

    /// Scales each vertex of this mesh.
    ///
    /// Normals are transformed by the inverse of the scale factors and renormalized.
    /// A negative factor mirrors the mesh, so the triangle winding is flipped to keep
    /// the front faces pointing outward.
    #[inline]
    pub fn scale_by(&mut self, s: Vec3) {
        for c in self.coords.iter_mut() {
            *c *= s;
        }

        if let Some(ref mut normals) = self.normals {
            let inv_scale = Vec3::new(1.0 / s.x, 1.0 / s.y, 1.0 / s.z);
            for n in normals.iter_mut() {
                *n = (*n * inv_scale).normalize_or_zero();
            }
        }

        if s.x * s.y * s.z < 0.0 {
            self.flip_triangles();
        }
    }

    /// Flips the orientation of every triangle of this mesh.
    #[inline]
    pub fn flip_triangles(&mut self) {
        for i in self.indices.iter_mut() {
            i.swap(1, 2);
        }
    }

    /// Recomputes the mesh normals using its vertex coordinates and adjacency information
    /// inferred from the index buffer.
    #[inline]
    pub fn recompute_normals(&mut self) {
        let mut new_normals = Vec::new();
        utils::compute_normals(&self.coords[..], &self.indices[..], &mut new_normals);
        self.normals = Some(new_normals);
    }

    /// Force the mesh to use a different vertex for every triangle corner.
    ///
    /// After this call, no two triangles share a vertex, so per-face attributes
    /// (like face colors) can be written without bleeding into neighbors.
    pub fn replicate_vertices(&mut self) {
        let mut coords = Vec::with_capacity(self.indices.len() * 3);
        let mut normals = self
            .normals
            .as_ref()
            .map(|_| Vec::with_capacity(self.indices.len() * 3));
        let mut colors = self
            .colors
            .as_ref()
            .map(|_| Vec::with_capacity(self.indices.len() * 3));

        for t in self.indices.iter() {
            for &i in t.iter() {
                let i = i as usize;
                coords.push(self.coords[i]);

                if let (Some(out), Some(src)) = (normals.as_mut(), self.normals.as_ref()) {
                    out.push(src[i]);
                }

                if let (Some(out), Some(src)) = (colors.as_mut(), self.colors.as_ref()) {
                    out.push(src[i]);
                }
            }
        }

        self.indices = (0..self.indices.len() as u32)
            .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
            .collect();
        self.coords = coords;
        self.normals = normals;
        self.colors = colors;
    }

    /// Assigns one color to each triangle, as returned by `face_color(triangle_id)`.
    ///
    /// Vertices are replicated first so that every face is painted independently.
    pub fn paint_faces<F: FnMut(usize) -> Color>(&mut self, mut face_color: F) {
        self.replicate_vertices();

        let mut colors = Vec::with_capacity(self.coords.len());
        for tri in 0..self.indices.len() {
            let c = face_color(tri);
            colors.extend_from_slice(&[c, c, c]);
        }

        self.colors = Some(colors);
    }

    /// Appends the vertices and triangles of `other` to this mesh.
    ///
    /// Attributes missing on either side are dropped from the result.
    pub fn append(&mut self, other: &RenderMesh) {
        let base = self.coords.len() as u32;
        self.coords.extend_from_slice(&other.coords);
        self.indices.extend(
            other
                .indices
                .iter()
                .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
        );

        match (self.normals.as_mut(), other.normals.as_ref()) {
            (Some(n), Some(on)) => n.extend_from_slice(on),
            _ => self.normals = None,
        }

        match (self.colors.as_mut(), other.colors.as_ref()) {
            (Some(c), Some(oc)) => c.extend_from_slice(oc),
            _ => self.colors = None,
        }
    }

    /// The axis-aligned bounds of the vertices, as `(min, max)`.
    pub fn aabb(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.coords.first()?;
        Some(
            self.coords
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }
}
