//! Window and monitor snapshot types.
//!
//! This module defines the vocabulary that all components share:
//! [`Window`] and [`Monitor`] describe what the external tools reported at
//! the moment of a query, and [`Rect`] / [`WindowId`] provide the
//! supporting data types.
//!
//! Every value here is a snapshot: it is stale the instant it is created
//! and is never mutated in place.  To observe a change, re-query through
//! the [`WindowManager`](crate::manager::WindowManager).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An X11 window id.
///
/// wmctrl prints ids in hexadecimal (`0x03a00007`) while xdotool prints
/// them in decimal; both forms parse.  [`fmt::Display`] renders the
/// canonical `0x`-prefixed hexadecimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Error from parsing a window id string.
#[derive(Debug, thiserror::Error)]
#[error("invalid window id: {0:?}")]
pub struct ParseWindowIdError(String);

impl FromStr for WindowId {
    type Err = ParseWindowIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse::<u32>(),
        };
        parsed
            .map(WindowId)
            .map_err(|_| ParseWindowIdError(s.to_string()))
    }
}

/// An axis-aligned bounding box on the virtual desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// X position (pixels).  Negative positions are legal in multi-head
    /// layouts.
    pub x: i32,
    /// Y position (pixels).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// One past the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// One past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Whether the point lies inside this rect.
    ///
    /// The interval is half-open: `x ∈ [self.x, self.x + width)` and
    /// likewise for `y`, so adjacent rects never both claim a point.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rect.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether this rect and `other` share any area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Area in square pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A snapshot of one on-screen window, parsed from one line of
/// `wmctrl -lG` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Window id.
    pub id: WindowId,
    /// Human-readable title.
    pub title: String,
    /// X position on the virtual desktop (pixels).
    pub x: i32,
    /// Y position on the virtual desktop (pixels).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether this window had input focus when the snapshot was taken.
    pub is_active: bool,
}

impl Window {
    /// The window's bounding box.
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// A snapshot of one connected monitor, parsed from `xrandr --current`
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    /// Sequential id in xrandr output order.
    pub id: u32,
    /// Output name the display server uses (e.g. `"DP-1"`).
    pub name: String,
    /// X position on the virtual desktop (pixels).
    pub x: i32,
    /// Y position on the virtual desktop (pixels).
    pub y: i32,
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
    /// Whether xrandr reported this output as the primary monitor.
    pub primary: bool,
}

impl Monitor {
    /// The monitor's bounding box.
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Whether the point lies on this monitor (half-open on both axes).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect().contains(x, y)
    }

    /// Portrait orientation.  A square monitor is neither vertical nor
    /// horizontal.
    pub fn is_vertical(&self) -> bool {
        self.height > self.width
    }

    /// Landscape orientation.
    pub fn is_horizontal(&self) -> bool {
        self.width > self.height
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}
