use crate::event::WindowEvent;
use glamx::{Mat4, Pose3, Vec3};

/// Trait that all camera implementations must implement.
///
/// Cameras control the viewpoint from which the scene is rendered.
pub trait Camera3d {
    /// Handles window events to update camera state.
    fn handle_event(&mut self, event: &WindowEvent);

    /// Returns the camera's position in world space.
    fn eye(&self) -> Vec3;

    /// Returns the camera's view transformation.
    ///
    /// This transforms world coordinates into camera space.
    fn view_transform(&self) -> Pose3;

    /// Returns the projection matrix, mapping camera space to clip space with a `[0, 1]`
    /// depth range.
    fn projection(&self) -> Mat4;

    /// Returns the combined projection and view transformation matrix.
    fn transformation(&self) -> Mat4 {
        self.projection() * self.view_transform().to_mat4()
    }

    /// Returns the near and far clipping plane distances.
    fn clip_planes(&self) -> (f32, f32);
}
