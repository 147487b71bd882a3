//! The catalog of shared, immutable primitive geometries.

use crate::color::{self, Color};
use crate::procedural::{self, RenderMesh};
use glamx::Vec3;
use std::f32::consts::PI;
use std::fmt;
use std::rc::Rc;

/// The shapes of the catalog.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Tall cylinder painted with the "pixel" face pattern.
    Cylinder,
    /// Short, wide cylinder.
    CylinderWide,
    /// Tall, thin cylinder.
    CylinderThin,
    /// Flat cylinder resting on the `y = 0` plane.
    Disc,
    /// Full sphere.
    Sphere,
    /// Half sphere, open toward `-z`.
    HalfSphere,
    /// Thin full torus on the `xy` plane.
    Torus,
    /// Thick half torus on the `y >= 0` half of the `xy` plane.
    HalfTorus,
    /// Cone standing on the `y = 0` plane, apex toward `+y`.
    Cone,
    /// Flat square slab.
    BoxFlat,
    /// One segment of the palm trunk, resting on the `y = 0` plane.
    PalmTrunk,
    /// One segment of a palm frond, extending along `+x` from the origin.
    PalmLeaf,
}

impl Shape {
    /// Every shape of the catalog.
    pub const ALL: [Shape; 12] = [
        Shape::Cylinder,
        Shape::CylinderWide,
        Shape::CylinderThin,
        Shape::Disc,
        Shape::Sphere,
        Shape::HalfSphere,
        Shape::Torus,
        Shape::HalfTorus,
        Shape::Cone,
        Shape::BoxFlat,
        Shape::PalmTrunk,
        Shape::PalmLeaf,
    ];

    /// The name of this shape, as used in logs and lookups.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Cylinder => "cylinder",
            Shape::CylinderWide => "cylinder_wide",
            Shape::CylinderThin => "cylinder_thin",
            Shape::Disc => "disc",
            Shape::Sphere => "sphere",
            Shape::HalfSphere => "half_sphere",
            Shape::Torus => "torus",
            Shape::HalfTorus => "half_torus",
            Shape::Cone => "cone",
            Shape::BoxFlat => "box_flat",
            Shape::PalmTrunk => "palm_trunk",
            Shape::PalmLeaf => "palm_leaf",
        }
    }

    fn build(self) -> RenderMesh {
        match self {
            Shape::Cylinder => {
                let radial = 26;
                let mut mesh = procedural::cylinder(0.75, 0.75, 3.0, radial, 20);
                paint_pixels(&mut mesh, radial, 20);
                mesh
            }
            Shape::CylinderWide => procedural::cylinder(1.1, 1.1, 0.75, 35, 5),
            Shape::CylinderThin => procedural::cylinder(0.35, 0.35, 3.0, 20, 1),
            Shape::Disc => {
                let mut mesh = procedural::cylinder(0.75, 0.75, 0.25, 32, 1);
                mesh.translate_by(Vec3::new(0.0, 0.125, 0.0));
                mesh
            }
            Shape::Sphere => procedural::sphere(0.75, 22, 22),
            Shape::HalfSphere => procedural::sphere_sector(0.75, 15, 15, 0.0, PI),
            Shape::Torus => procedural::torus(1.25, 0.25, 16, 40),
            Shape::HalfTorus => procedural::torus_arc(1.25, 0.35, 16, 20, PI),
            Shape::Cone => {
                let mut mesh = procedural::cone(1.25, 2.25, 38);
                mesh.translate_by(Vec3::new(0.0, 1.125, 0.0));
                mesh
            }
            Shape::BoxFlat => procedural::cuboid(Vec3::new(1.25, 0.35, 1.25)),
            Shape::PalmTrunk => {
                let mut mesh = procedural::cylinder(0.28, 0.34, 0.55, 14, 1);
                mesh.translate_by(Vec3::new(0.0, 0.275, 0.0));
                mesh
            }
            Shape::PalmLeaf => {
                let mut mesh = procedural::sphere(1.0, 10, 6);
                mesh.scale_by(Vec3::new(0.55, 0.06, 0.2));
                mesh.translate_by(Vec3::new(0.55, 0.0, 0.0));
                mesh
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable mesh shared by every scene node that displays it.
#[derive(Debug)]
pub struct Geometry {
    shape: Shape,
    mesh: RenderMesh,
}

impl Geometry {
    /// The catalog entry this geometry was built from.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The underlying mesh.
    #[inline]
    pub fn mesh(&self) -> &RenderMesh {
        &self.mesh
    }

    /// The number of vertices of the mesh.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.mesh.num_vertices()
    }

    /// The number of triangles of the mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.mesh.num_triangles()
    }
}

/// The geometry manager.
///
/// Upon construction, it contains one geometry per [`Shape`]. Geometries are handed out as
/// `Rc`s: every mesh node referencing a shape shares the same vertex data.
pub struct GeometryManager {
    geometries: Vec<Rc<Geometry>>,
}

impl Default for GeometryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryManager {
    /// Builds the whole catalog.
    pub fn new() -> GeometryManager {
        let geometries = Shape::ALL
            .iter()
            .map(|&shape| {
                Rc::new(Geometry {
                    shape,
                    mesh: shape.build(),
                })
            })
            .collect();

        GeometryManager { geometries }
    }

    /// The shared geometry of `shape`.
    #[inline]
    pub fn get(&self, shape: Shape) -> Rc<Geometry> {
        self.geometries[shape as usize].clone()
    }

    /// Looks a geometry up by its name. Returns `None` if no shape has that name.
    pub fn get_with_name(&self, name: &str) -> Option<Rc<Geometry>> {
        self.geometries
            .iter()
            .find(|g| g.shape.name() == name)
            .cloned()
    }

    /// Iterates through every geometry of the catalog.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Geometry>> {
        self.geometries.iter()
    }
}

// Paints the side of a cylinder with a scattered pattern of palette "pixels", one per quad.
// Caps stay white.
fn paint_pixels(mesh: &mut RenderMesh, radial_segments: u32, height_segments: u32) {
    let palette: Vec<Color> = color::PIXEL_PATTERN
        .iter()
        .map(|hex| color::from_hex(*hex))
        .collect();
    let side_triangles = (radial_segments * height_segments * 2) as usize;

    mesh.paint_faces(|tri| {
        if tri >= side_triangles {
            return color::WHITE;
        }

        let quad = (tri / 2) as u32;
        let row = quad / radial_segments;
        let col = quad % radial_segments;
        palette[pixel_index(row, col, palette.len())]
    });
}

#[inline]
fn pixel_index(row: u32, col: u32, len: usize) -> usize {
    let h = row
        .wrapping_mul(73_856_093)
        .wrapping_add(col.wrapping_mul(19_349_663));
    ((h ^ (h >> 13)) as usize) % len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_shape_discriminants() {
        let manager = GeometryManager::new();
        for shape in Shape::ALL {
            assert_eq!(manager.get(shape).shape(), shape);
        }
    }

    #[test]
    fn lookups_share_the_same_geometry() {
        let manager = GeometryManager::new();
        let a = manager.get(Shape::Sphere);
        let b = manager.get_with_name("sphere").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert!(manager.get_with_name("teapot").is_none());
    }

    #[test]
    fn sphere_and_half_sphere_follow_their_grids() {
        let manager = GeometryManager::new();
        assert_eq!(manager.get(Shape::Sphere).num_vertices(), 23 * 23);
        assert_eq!(manager.get(Shape::HalfSphere).num_vertices(), 16 * 16);
    }

    #[test]
    fn disc_and_cone_rest_on_the_ground() {
        let manager = GeometryManager::new();
        for shape in [Shape::Disc, Shape::Cone, Shape::PalmTrunk] {
            let (lo, _) = manager.get(shape).mesh().aabb().unwrap();
            assert!(lo.y.abs() < 1.0e-5, "{shape} starts at {}", lo.y);
        }
    }

    #[test]
    fn only_the_pixel_cylinder_is_painted() {
        let manager = GeometryManager::new();
        let painted: Vec<Shape> = manager
            .iter()
            .filter(|g| g.mesh().has_colors())
            .map(|g| g.shape())
            .collect();
        assert_eq!(painted, vec![Shape::Cylinder]);

        let colors = manager.get(Shape::Cylinder).mesh().colors.clone().unwrap();
        assert!(colors.iter().any(|c| *c != color::WHITE));
    }
}
