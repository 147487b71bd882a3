//! The native surface the stage is drawn on.

use std::cell::RefCell;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::context::Context;
use crate::event::{Action, Key, TouchAction, WindowEvent};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, TouchPhase, WindowEvent as WinitWindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes};

// winit allows a single event loop per program and it is neither Send nor Sync.
thread_local! {
    static EVENT_LOOP: RefCell<Option<EventLoop<()>>> = const { RefCell::new(None) };
    static PENDING_EVENTS: RefCell<Vec<PendingEvent>> = const { RefCell::new(Vec::new()) };
}

enum PendingEvent {
    WindowEvent(WindowEvent),
    Resize { width: u32, height: u32 },
}

/// How the canvas presents its frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanvasSetup {
    /// Whether presentation waits for the vertical blank.
    pub vsync: bool,
}

/// A window with a configured wgpu surface and depth buffer.
pub struct Canvas {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    out_events: Sender<WindowEvent>,
}

impl Canvas {
    /// Opens a window and, on first use, initializes the global wgpu [`Context`].
    ///
    /// # Panics
    /// Panics if no window, adapter or device can be created: nothing can be drawn then.
    pub async fn open(
        title: &str,
        width: u32,
        height: u32,
        setup: CanvasSetup,
        out_events: Sender<WindowEvent>,
    ) -> Self {
        let attributes = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width as f64, height as f64));

        let window = EVENT_LOOP.with(|cell| {
            let mut event_loop = cell.borrow_mut();
            let event_loop = event_loop
                .get_or_insert_with(|| EventLoop::new().expect("Failed to create event loop"));
            #[allow(deprecated)]
            event_loop
                .create_window(attributes)
                .expect("Failed to create window")
        });
        let window = Arc::new(window);

        let surface = if Context::is_initialized() {
            Context::get()
                .instance
                .create_surface(window.clone())
                .expect("Failed to create surface")
        } else {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let surface = instance
                .create_surface(window.clone())
                .expect("Failed to create surface");

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .expect("Failed to find an appropriate adapter");

            let (device, queue) = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("memphis3d device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                    trace: wgpu::Trace::Off,
                    experimental_features: wgpu::ExperimentalFeatures::disabled(),
                })
                .await
                .expect("Failed to create device");

            let format = preferred_format(&surface.get_capabilities(&adapter));
            log::info!(
                "Rendering with {:?} into {:?}.",
                adapter.get_info().backend,
                format
            );
            Context::init(instance, device, queue, adapter, format);
            surface
        };

        let ctxt = Context::get();
        let caps = surface.get_capabilities(&ctxt.adapter);
        let size = window.inner_size();

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: ctxt.surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if setup.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctxt.device, &surface_config);

        let depth_view =
            Self::create_depth_view(&ctxt.device, surface_config.width, surface_config.height);

        Canvas {
            window,
            surface,
            surface_config,
            depth_view,
            out_events,
        }
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Context::depth_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Pumps the winit event loop and forwards the translated events.
    pub fn poll_events(&mut self) {
        use winit::platform::pump_events::EventLoopExtPumpEvents;

        struct EventCollector;

        impl ApplicationHandler for EventCollector {
            fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

            fn window_event(
                &mut self,
                _event_loop: &ActiveEventLoop,
                _window_id: winit::window::WindowId,
                event: WinitWindowEvent,
            ) {
                let pending = translate_event(event);
                if !pending.is_empty() {
                    PENDING_EVENTS.with(|storage| storage.borrow_mut().extend(pending));
                }
            }
        }

        EVENT_LOOP.with(|cell| {
            if let Some(ref mut event_loop) = *cell.borrow_mut() {
                let timeout = Some(std::time::Duration::ZERO);
                let _ = event_loop.pump_app_events(timeout, &mut EventCollector);
            }
        });

        let events = PENDING_EVENTS.with(|storage| std::mem::take(&mut *storage.borrow_mut()));
        for event in events {
            match event {
                PendingEvent::WindowEvent(event) => {
                    let _ = self.out_events.send(event);
                }
                PendingEvent::Resize { width, height } => self.resize(width, height),
            }
        }
    }

    /// Reconfigures the surface and the depth buffer for a new framebuffer size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let ctxt = Context::get();
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&ctxt.device, &self.surface_config);
        self.depth_view = Self::create_depth_view(&ctxt.device, width, height);
    }

    /// Reconfigures the surface at its current size, after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.resize(self.surface_config.width, self.surface_config.height);
    }

    /// The next texture to draw into.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Presents a drawn frame.
    pub fn present(&self, frame: wgpu::SurfaceTexture) {
        self.window.pre_present_notify();
        frame.present();
    }

    /// The depth buffer matching the surface.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// The framebuffer size, in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// The format of the surface textures.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Requests a redraw from the windowing system.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Picks a linear surface format; gamma is applied by the shaders.
fn preferred_format(caps: &wgpu::SurfaceCapabilities) -> wgpu::TextureFormat {
    caps.formats
        .iter()
        .find(|f| !f.is_srgb())
        .copied()
        .unwrap_or(caps.formats[0])
}

fn translate_event(event: WinitWindowEvent) -> Vec<PendingEvent> {
    match event {
        WinitWindowEvent::CloseRequested => vec![PendingEvent::WindowEvent(WindowEvent::Close)],
        WinitWindowEvent::Resized(size) if size.width > 0 && size.height > 0 => vec![
            PendingEvent::Resize {
                width: size.width,
                height: size.height,
            },
            PendingEvent::WindowEvent(WindowEvent::FramebufferSize(size.width, size.height)),
        ],
        WinitWindowEvent::CursorMoved { position, .. } => vec![PendingEvent::WindowEvent(
            WindowEvent::CursorPos(position.x, position.y),
        )],
        WinitWindowEvent::Touch(touch) => {
            let action = match touch.phase {
                TouchPhase::Started => TouchAction::Start,
                TouchPhase::Ended => TouchAction::End,
                TouchPhase::Moved => TouchAction::Move,
                TouchPhase::Cancelled => TouchAction::Cancel,
            };
            vec![PendingEvent::WindowEvent(WindowEvent::Touch(
                touch.id,
                touch.location.x,
                touch.location.y,
                action,
            ))]
        }
        WinitWindowEvent::KeyboardInput { event, .. } if !event.repeat => {
            vec![PendingEvent::WindowEvent(WindowEvent::Key(
                translate_key(event.physical_key),
                translate_action(event.state),
            ))]
        }
        _ => vec![],
    }
}

fn translate_action(action: ElementState) -> Action {
    match action {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}

fn translate_key(physical_key: PhysicalKey) -> Key {
    match physical_key {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(KeyCode::Space) => Key::Space,
        _ => Key::Unknown,
    }
}
