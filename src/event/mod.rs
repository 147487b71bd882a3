//! Window events.

pub use self::window_event::{Action, Key, TouchAction, WindowEvent};

mod window_event;
