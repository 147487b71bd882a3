//! Shared resources: geometries, materials, and textures.

pub use crate::resource::geometry::{Geometry, GeometryManager, Shape};
pub use crate::resource::matcap::{
    fallback_matcap, fetch_matcap, load_matcap, MatcapLoader, MatcapSource, FALLBACK_MATCAP_SIZE,
    MAX_MATCAP_DOWNLOAD,
};
pub use crate::resource::material::{Finish, Material, MaterialManager, Shading};
pub use crate::resource::texture::Texture;

mod geometry;
mod matcap;
mod material;
mod texture;
