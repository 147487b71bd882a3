//! Renderable content of a scene node.

use crate::resource::{Geometry, Material};
use glamx::Mat4;
use std::rc::Rc;

/// A mesh: one shared geometry displayed with one shared material.
///
/// Cloning an object clones the references, never the geometry or the material.
#[derive(Clone, Debug)]
pub struct Object3d {
    geometry: Rc<Geometry>,
    material: Rc<Material>,
}

impl Object3d {
    /// Creates a new object.
    pub fn new(geometry: Rc<Geometry>, material: Rc<Material>) -> Object3d {
        Object3d { geometry, material }
    }

    /// The geometry of this object.
    #[inline]
    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }

    /// The material of this object.
    #[inline]
    pub fn material(&self) -> &Rc<Material> {
        &self.material
    }
}

/// An object ready to be drawn, with its world transform.
#[derive(Clone, Debug)]
pub struct DrawItem {
    /// The object geometry.
    pub geometry: Rc<Geometry>,
    /// The object material.
    pub material: Rc<Material>,
    /// The object-to-world matrix, including scale.
    pub model: Mat4,
}
