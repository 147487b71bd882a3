//! The window system.

pub use self::canvas::{Canvas, CanvasSetup};
pub use self::window::Window;

mod canvas;
#[allow(clippy::module_inception)]
mod window;
