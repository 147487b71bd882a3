/// Whether a key was pressed or released.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// The key was released.
    Release,
    /// The key was pressed.
    Press,
}

/// The keys the application reacts to.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// Closes the window.
    Escape,
    /// Starts or stops the animation.
    Space,
    /// Any other key.
    Unknown,
}

/// The phase of a touch contact.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TouchAction {
    /// A finger touched the screen.
    Start,
    /// A finger ended touching the screen.
    End,
    /// A finger moved.
    Move,
    /// The system cancelled the touch.
    Cancel,
}

/// An event triggered by the window.
///
/// Positions are in physical pixels, with `(0, 0)` at the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowEvent {
    /// The framebuffer was resized to `(width, height)`.
    FramebufferSize(u32, u32),
    /// The user asked to close the window.
    Close,
    /// The cursor moved to `(x, y)`.
    CursorPos(f64, f64),
    /// A touch contact `(id, x, y, phase)`.
    Touch(u64, f64, f64, TouchAction),
    /// A key was pressed or released.
    Key(Key, Action),
}
