//! The window the stage is rendered into.

use std::sync::mpsc::{self, Receiver};

use crate::camera::Camera3d;
use crate::color::Color;
use crate::config::Settings;
use crate::context::Context;
use crate::event::WindowEvent;
use crate::renderer::{clear_color, SceneRenderer};
use crate::scene::SceneNode3d;
use crate::window::canvas::{Canvas, CanvasSetup};
use image::RgbaImage;

/// A window owning its surface and the scene renderer.
pub struct Window {
    canvas: Canvas,
    events: Receiver<WindowEvent>,
    renderer: SceneRenderer,
    background: Color,
    should_close: bool,
}

impl Window {
    /// Opens a window configured by `settings`.
    pub async fn open(settings: &Settings) -> Window {
        let (event_send, event_receive) = mpsc::channel();
        let canvas = Canvas::open(
            &settings.title,
            settings.width,
            settings.height,
            CanvasSetup {
                vsync: settings.vsync,
            },
            event_send,
        )
        .await;

        let (width, height) = canvas.size();
        log::info!("Opened a {}x{} window.", width, height);

        Window {
            canvas,
            events: event_receive,
            renderer: SceneRenderer::new(),
            background: settings.background,
            should_close: false,
        }
    }

    /// Polls the windowing system and returns the events received since the last call.
    pub fn events(&mut self) -> Vec<WindowEvent> {
        self.canvas.poll_events();
        self.events.try_iter().collect()
    }

    /// The framebuffer size, in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.canvas.size()
    }

    /// Replaces the matcap image.
    pub fn set_matcap(&mut self, image: &RgbaImage) {
        self.renderer.set_matcap(image);
    }

    /// The scene renderer.
    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Marks the window as closing.
    pub fn close(&mut self) {
        self.should_close = true;
    }

    /// Whether the window is closing.
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Renders one frame of `scene` seen from `camera`.
    ///
    /// Returns `false` once the window is closing.
    pub async fn render(&mut self, scene: &mut SceneNode3d, camera: &dyn Camera3d) -> bool {
        if self.should_close {
            return false;
        }

        let frame = match self.canvas.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Lost) => {
                log::warn!("Surface outdated or lost, reconfiguring.");
                self.canvas.reconfigure();
                return true;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the next frame.");
                return true;
            }
            Err(err) => {
                log::error!("Cannot acquire the next frame: {}", err);
                self.close();
                return false;
            }
        };

        self.renderer.prepare(scene, camera);

        let ctxt = Context::get();
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = ctxt.create_command_encoder(Some("stage_encoder"));

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("stage_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(
                            self.background,
                            self.canvas.surface_format(),
                        )),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.canvas.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer.render(&mut pass);
        }

        ctxt.submit(std::iter::once(encoder.finish()));
        self.canvas.present(frame);
        self.canvas.request_redraw();

        true
    }
}
