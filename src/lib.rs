//! **wmosaic**: X11 window and monitor control through external tools.
//!
//! The crate is a thin facade over wmctrl, xdotool and xrandr: queries
//! parse their line-oriented output into [`Window`](model::Window) and
//! [`Monitor`](model::Monitor) snapshots, mutations format and run one
//! command each.  On top of that sits a deterministic [`mosaic`] pass
//! that tiles each monitor's windows into an evenly divided grid.
//!
//! # Architecture
//!
//! The crate is organised around one core trait:
//!
//! * [`traits::WindowSystem`] abstracts enumeration and control so the
//!   facade and the mosaic arithmetic are not coupled to any specific
//!   tool set.
//!
//! The concrete implementation lives in [`x11`] (subprocess calls plus
//! one EWMH query over x11rb); [`manager::WindowManager`] adds the
//! derived lookups and the monitor-to-monitor move on top.
//!
//! Everything is synchronous and blocking: one external process (or one
//! short-lived display connection) per operation, no shared state beyond
//! the snapshot a query returned.

pub mod config;
pub mod exec;
pub mod manager;
pub mod model;
pub mod mosaic;
pub mod traits;
pub mod x11;
