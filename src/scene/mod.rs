//! Everything related to the scene graph.

pub use self::object3d::{DrawItem, Object3d};
pub use self::scene_node3d::{SceneNode3d, SceneNodeData3d};

mod object3d;
mod scene_node3d;
