//! GPU rendering of the scene graph.

pub use self::gpu_mesh::{interleave, GpuMesh, GpuMeshCache, MeshVertex};
pub use self::scene_renderer::{clear_color, normal_matrix, Culling, SceneRenderer};
pub use self::uniform_batch::{aligned_size, UniformBatch};

mod gpu_mesh;
mod scene_renderer;
mod uniform_batch;
