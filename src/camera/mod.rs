//! Cameras.

pub use self::camera3d::Camera3d;
pub use self::stage_camera3d::{StageCamera3d, ViewportBand, BASE_DISTANCE};

mod camera3d;
mod stage_camera3d;
