//! Core trait that decouples the facade from any specific window system.
//!
//! The concrete backend ([`X11Cli`](crate::x11::X11Cli)) shells out to
//! wmctrl / xdotool / xrandr; a test harness can implement the same trait
//! in memory.  The [`WindowManager`](crate::manager::WindowManager) and the
//! [`mosaic`](crate::mosaic) pass only depend on this abstraction.

use crate::model::{Monitor, Window, WindowId};

/// Abstraction over a window system that can enumerate and control
/// windows and monitors.
///
/// Each method corresponds to one external query or command.  Mutating
/// methods report success from the command's exit status; they never
/// re-query to confirm the effect.
pub trait WindowSystem {
    /// The error type produced by this window system.
    type Error: std::error::Error + Send + 'static;

    /// All connected monitors, in the order the display server reports
    /// them.
    fn monitors(&self) -> Result<Vec<Monitor>, Self::Error>;

    /// All managed windows, with `is_active` set on the focused one.
    fn windows(&self) -> Result<Vec<Window>, Self::Error>;

    /// The id of the focused window, or `None` if nothing has focus.
    fn active_window_id(&self) -> Result<Option<WindowId>, Self::Error>;

    /// Move the window's top-left corner to `(x, y)`.
    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Resize the window, keeping its current position.
    fn resize_window(&self, id: WindowId, width: u32, height: u32) -> Result<(), Self::Error>;

    /// Give the window input focus (raising it if needed).
    fn focus_window(&self, id: WindowId) -> Result<(), Self::Error>;

    /// Ask the window manager to close the window.
    fn close_window(&self, id: WindowId) -> Result<(), Self::Error>;

    /// Iconify the window.
    fn minimize_window(&self, id: WindowId) -> Result<(), Self::Error>;

    /// Maximize the window both vertically and horizontally.
    fn maximize_window(&self, id: WindowId) -> Result<(), Self::Error>;

    /// Clear both maximization states.
    fn unmaximize_window(&self, id: WindowId) -> Result<(), Self::Error>;

    /// Whether the window is currently maximized in both directions.
    fn is_maximized(&self, id: WindowId) -> Result<bool, Self::Error>;
}

//  Test double
