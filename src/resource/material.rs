//! Surface appearances and the material manager.

use crate::color::{self, hex, Color};
use std::fmt;
use std::rc::Rc;

/// How a surface reacts to light.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shading {
    /// Physically based, metallic-roughness shading.
    Standard {
        /// Microfacet roughness in [0, 1].
        roughness: f32,
        /// Metalness in [0, 1].
        metalness: f32,
    },
    /// Blinn-Phong shading.
    Phong {
        /// Specular exponent.
        shininess: f32,
        /// Linear color of the specular highlight.
        specular: Color,
    },
    /// Lighting baked in a matcap image, looked up with the view-space normal.
    Matcap,
}

/// The finishes of the palette.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Finish {
    /// Matte white.
    White,
    /// Glossy black.
    Black,
    /// Matte powder blue.
    Blue,
    /// Phong bubblegum pink.
    Pink,
    /// Glossy, flat-shaded mint green.
    Green,
    /// White multiplied by the per-vertex colors of the mesh.
    Pixel,
    /// Reflective gold from the matcap image.
    Gold,
}

impl Finish {
    /// Every finish of the palette.
    pub const ALL: [Finish; 7] = [
        Finish::White,
        Finish::Black,
        Finish::Blue,
        Finish::Pink,
        Finish::Green,
        Finish::Pixel,
        Finish::Gold,
    ];

    /// The name of this finish, as used in logs and lookups.
    pub fn name(self) -> &'static str {
        match self {
            Finish::White => "white",
            Finish::Black => "black",
            Finish::Blue => "blue",
            Finish::Pink => "pink",
            Finish::Green => "green2",
            Finish::Pixel => "pixel",
            Finish::Gold => "matcap_gold",
        }
    }

    fn build(self) -> Material {
        let standard = |roughness, metalness| Shading::Standard {
            roughness,
            metalness,
        };

        let base = Material {
            finish: self,
            color: color::WHITE,
            shading: standard(0.9, 0.2),
            flat_shading: false,
            double_sided: true,
            vertex_colors: false,
        };

        match self {
            Finish::White => base.with_color(hex::WHITE),
            Finish::Black => Material {
                shading: standard(0.2, 0.6),
                ..base.with_color(hex::BLACK)
            },
            Finish::Blue => Material {
                shading: standard(0.9, 0.1),
                ..base.with_color(hex::BLUE)
            },
            Finish::Pink => Material {
                shading: Shading::Phong {
                    shininess: 30.0,
                    specular: color::from_hex(0x111111),
                },
                double_sided: false,
                ..base.with_color(hex::PINK)
            },
            Finish::Green => Material {
                shading: standard(0.1, 0.3),
                flat_shading: true,
                ..base.with_color(hex::MINT)
            },
            Finish::Pixel => Material {
                shading: standard(0.1, 0.25),
                double_sided: false,
                vertex_colors: true,
                ..base.with_color(hex::WHITE)
            },
            Finish::Gold => Material {
                shading: Shading::Matcap,
                ..base
            },
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable surface appearance, shared by every mesh node that uses it.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    finish: Finish,
    color: Color,
    shading: Shading,
    flat_shading: bool,
    double_sided: bool,
    vertex_colors: bool,
}

impl Material {
    fn with_color(self, srgb_hex: u32) -> Material {
        Material {
            color: color::from_hex(srgb_hex),
            ..self
        }
    }

    /// The palette entry this material was built from.
    #[inline]
    pub fn finish(&self) -> Finish {
        self.finish
    }

    /// The base color, in linear space.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The shading model.
    #[inline]
    pub fn shading(&self) -> Shading {
        self.shading
    }

    /// Whether normals are derived per face instead of interpolated.
    #[inline]
    pub fn flat_shading(&self) -> bool {
        self.flat_shading
    }

    /// Whether back faces are drawn.
    #[inline]
    pub fn double_sided(&self) -> bool {
        self.double_sided
    }

    /// Whether the mesh vertex colors multiply the base color.
    #[inline]
    pub fn vertex_colors(&self) -> bool {
        self.vertex_colors
    }

    /// Whether this material samples the matcap texture.
    #[inline]
    pub fn is_matcap(&self) -> bool {
        self.shading == Shading::Matcap
    }
}

/// The material manager.
///
/// Upon construction, it contains one material per [`Finish`], handed out as `Rc`s.
pub struct MaterialManager {
    materials: Vec<Rc<Material>>,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Builds the whole palette.
    pub fn new() -> MaterialManager {
        let materials = Finish::ALL
            .iter()
            .map(|finish| Rc::new(finish.build()))
            .collect();

        MaterialManager { materials }
    }

    /// The shared material of `finish`.
    #[inline]
    pub fn get(&self, finish: Finish) -> Rc<Material> {
        self.materials[finish as usize].clone()
    }

    /// Looks a material up by its name. Returns `None` if no finish has that name.
    pub fn get_with_name(&self, name: &str) -> Option<Rc<Material>> {
        self.materials
            .iter()
            .find(|m| m.finish.name() == name)
            .cloned()
    }

    /// Iterates through every material of the palette.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Material>> {
        self.materials.iter()
    }
}
