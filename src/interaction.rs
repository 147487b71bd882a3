//! Pointer and viewport state fed by window events.

use crate::event::{TouchAction, WindowEvent};

/// The size of the framebuffer, in physical pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport of the given size.
    pub fn new(width: u32, height: u32) -> Viewport {
        Viewport { width, height }
    }

    /// Whether one of the dimensions is zero (e.g. a minimized window).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The `width / height` ratio, or `None` for an empty viewport.
    #[inline]
    pub fn aspect(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

/// The latest pointer position, normalized to `[-1, 1]` on both axes.
///
/// `(0, 0)` is the center of the viewport, `x` grows to the right and `y` grows upward.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerState {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl PointerState {
    /// The pointer at the center of the viewport.
    pub const CENTER: PointerState = PointerState { x: 0.0, y: 0.0 };

    /// Creates a pointer state, clamping both coordinates to `[-1, 1]`.
    ///
    /// Non-finite coordinates are treated as `0`.
    pub fn new(x: f32, y: f32) -> PointerState {
        fn clamp(v: f32) -> f32 {
            if v.is_finite() {
                v.clamp(-1.0, 1.0)
            } else {
                0.0
            }
        }

        PointerState {
            x: clamp(x),
            y: clamp(y),
        }
    }

    /// Normalizes a window position given in physical pixels.
    ///
    /// Returns `None` if the viewport is empty.
    pub fn from_window_position(px: f64, py: f64, viewport: Viewport) -> Option<PointerState> {
        if viewport.is_empty() {
            return None;
        }

        let x = 2.0 * px / viewport.width as f64 - 1.0;
        let y = 1.0 - 2.0 * py / viewport.height as f64;
        Some(PointerState::new(x as f32, y as f32))
    }
}

/// Tracks the pointer and the viewport from window events.
///
/// Only the latest sample is kept: events arriving between two frames overwrite each other.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
    pointer: PointerState,
    viewport: Viewport,
}

impl Interaction {
    /// Creates the interaction state for a viewport, with the pointer at its center.
    pub fn new(viewport: Viewport) -> Interaction {
        Interaction {
            pointer: PointerState::CENTER,
            viewport,
        }
    }

    /// The latest pointer state.
    #[inline]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// The current viewport.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Applies a window event.
    ///
    /// Returns `true` if the pointer state changed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match *event {
            WindowEvent::CursorPos(x, y)
            | WindowEvent::Touch(_, x, y, TouchAction::Start | TouchAction::Move) => {
                self.move_pointer(x, y)
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.viewport = Viewport::new(w, h);
                false
            }
            _ => false,
        }
    }

    fn move_pointer(&mut self, x: f64, y: f64) -> bool {
        match PointerState::from_window_position(x, y, self.viewport) {
            Some(pointer) if pointer != self.pointer => {
                self.pointer = pointer;
                true
            }
            _ => false,
        }
    }
}
