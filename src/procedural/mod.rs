//! Procedural generation of the primitive meshes the letters are made of.
//!
//! All generators produce a [`RenderMesh`] with normals, centered at the origin and
//! using `+y` as up. Curved shapes are laid out as vertex grids so their vertex count
//! only depends on their segment counts.

pub use self::cuboid::cuboid;
pub use self::cylinder::{cone, cylinder};
pub use self::render_mesh::RenderMesh;
pub use self::sphere::{sphere, sphere_sector};
pub use self::torus::{torus, torus_arc};

mod cuboid;
mod cylinder;
mod render_mesh;
mod sphere;
mod torus;
pub mod utils;
