//! X11-specific implementations.
//!
//! This module provides the concrete [`WindowSystem`](crate::traits::WindowSystem)
//! backend, powered by the wmctrl / xdotool / xrandr command-line tools and
//! one direct EWMH property query over x11rb.
//!
//! Nothing outside this module should reference the tools directly.

pub mod backend;
mod ewmh;

pub use backend::{X11Cli, X11Error};
