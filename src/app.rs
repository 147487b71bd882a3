//! The application: stage, camera, pointer and animation wired to a window.

use crate::animation::AnimationLoop;
use crate::camera::{Camera3d, StageCamera3d};
use crate::config::Settings;
use crate::context::Context;
use crate::event::{Action, Key, WindowEvent};
use crate::interaction::{Interaction, Viewport};
use crate::resource::{GeometryManager, MatcapLoader, MaterialManager};
use crate::typography::{self, Stage};
use crate::window::Window;
use image::RgbaImage;
use web_time::Instant;

/// The longest time step fed to the animation, in seconds.
///
/// Longer pauses (a dragged window, a breakpoint) would otherwise snap the stage.
pub const MAX_FRAME_TIME: f32 = 0.1;

/// Everything the application updates between two frames.
pub struct AppContext {
    /// The assembled scene.
    pub stage: Stage,
    /// The camera, framing the stage for the current aspect ratio.
    pub camera: StageCamera3d,
    /// The normalized pointer.
    pub interaction: Interaction,
    /// The pointer-driven animation of the top-level groups.
    pub animation: AnimationLoop,
    matcap: Option<MatcapLoader>,
    quit: bool,
}

impl AppContext {
    /// Assembles the stage for a `width`x`height` framebuffer.
    pub fn new(settings: &Settings, width: u32, height: u32) -> AppContext {
        let geometries = GeometryManager::new();
        let materials = MaterialManager::new();
        let stage = typography::assemble(&geometries, &materials, &settings.palm);

        let mut animation = AnimationLoop::new(settings.motion);
        for (node, weight) in stage.animated_groups() {
            animation.add_group(node, weight);
        }

        AppContext {
            stage,
            camera: StageCamera3d::new(width, height),
            interaction: Interaction::new(Viewport::new(width, height)),
            animation,
            matcap: settings.matcap.clone().map(MatcapLoader::spawn),
            quit: false,
        }
    }

    /// Reacts to one window event.
    ///
    /// Space starts or stops the animation, Escape and closing the window quit.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::Key(Key::Space, Action::Press) => self.animation.toggle(),
            WindowEvent::Key(Key::Escape, Action::Release) | WindowEvent::Close => {
                self.quit = true
            }
            _ => {}
        }

        self.camera.handle_event(event);
        let _ = self.interaction.handle_event(event);
    }

    /// Advances the animation by `dt` seconds.
    ///
    /// Returns `true` if the stage moved.
    pub fn advance(&mut self, dt: f32) -> bool {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.animation.step(self.interaction.pointer(), dt)
    }

    /// The matcap image, once it has been decoded.
    pub fn poll_matcap(&mut self) -> Option<RgbaImage> {
        let image = self.matcap.as_mut()?.poll();
        if !self.matcap.as_ref().is_some_and(|loader| loader.is_pending()) {
            self.matcap = None;
        }
        image
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

/// Opens a window and runs the animation until it is closed.
pub async fn run(settings: Settings) {
    let mut window = Window::open(&settings).await;
    let (width, height) = window.size();
    let mut app = AppContext::new(&settings, width, height);

    let mut last_frame = Instant::now();

    loop {
        for event in window.events() {
            app.handle_event(&event);
        }

        if app.should_quit() {
            window.close();
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        let _ = app.advance(dt);

        if let Some(image) = app.poll_matcap() {
            window.set_matcap(&image);
        }

        if !window.render(&mut app.stage.root, &app.camera).await {
            break;
        }
    }

    log::info!(
        "Closing after {} animated frames.",
        app.animation.frames()
    );
    Context::reset();
}
