//! Mosaic window arrangement.
//!
//! [`grid_shape`] and [`cells`] are pure arithmetic: given a window count
//! and a monitor they produce a `rows × cols` grid of bounding boxes that
//! partitions the monitor exactly.  [`arrange`] applies the grid through
//! the [`WindowManager`](crate::manager::WindowManager) facade, one resize
//! and one move per window.
//!
//! The arrangement is deterministic: the same window set and monitor set
//! always produce the same grid and the same window-to-cell assignment.

use crate::manager::{ManagerError, WindowManager};
use crate::model::{Monitor, Rect, Window};
use crate::traits::WindowSystem;
use log::{debug, warn};

/// A `rows × cols` grid over one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

/// Pick the grid for `count` windows on `monitor`.
///
/// Among all shapes with `rows * cols >= count`, the one wasting the
/// fewest cells wins; ties go to the shape whose cells are nearest square
/// on this monitor, then to fewer rows.  On a landscape monitor this
/// yields 2 → 1×2, 3 → 1×3, 4 → 2×2, 9 → 3×3; on a portrait monitor the
/// orientation flips.
pub fn grid_shape(count: usize, monitor: &Monitor) -> GridShape {
    let count = count.max(1) as u32;
    let mut best = GridShape { rows: 1, cols: count };
    let mut best_key = (u32::MAX, f64::INFINITY);

    for rows in 1..=count {
        let cols = count.div_ceil(rows);
        let waste = rows * cols - count;
        let cell_width = monitor.width as f64 / cols as f64;
        let cell_height = monitor.height as f64 / rows as f64;
        let skew = (cell_width / cell_height).ln().abs();
        if (waste, skew) < best_key {
            best_key = (waste, skew);
            best = GridShape { rows, cols };
        }
    }
    best
}

/// The grid's cell bounding boxes, row-major from the monitor's top-left.
///
/// Cell edges are cut at proportional integer positions, so the cells
/// partition the monitor exactly even when its size does not divide
/// evenly: no gaps, no overlaps.
pub fn cells(monitor: &Monitor, shape: GridShape) -> Vec<Rect> {
    let col_edge = |col: u32| -> i32 {
        monitor.x + (col as i64 * monitor.width as i64 / shape.cols as i64) as i32
    };
    let row_edge = |row: u32| -> i32 {
        monitor.y + (row as i64 * monitor.height as i64 / shape.rows as i64) as i32
    };

    let mut rects = Vec::with_capacity((shape.rows * shape.cols) as usize);
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            let x = col_edge(col);
            let y = row_edge(row);
            rects.push(Rect {
                x,
                y,
                width: (col_edge(col + 1) - x) as u32,
                height: (row_edge(row + 1) - y) as u32,
            });
        }
    }
    rects
}

/// Arrange every monitor's windows into a mosaic.
///
/// Windows stay on the monitor they currently occupy.  Per monitor, the
/// windows are sorted by lowercased title (ties by id), a single window
/// is simply maximized, and two or more are tiled into the grid cells in
/// row-major order.  A failure on one window is logged and does not stop
/// the rest of the arrangement.
pub fn arrange<S: WindowSystem>(wm: &WindowManager<S>) -> Result<(), ManagerError> {
    for (monitor, mut windows) in wm.windows_by_monitor()? {
        if windows.is_empty() {
            continue;
        }

        windows.sort_by(|a, b| {
            (a.title.to_lowercase(), a.id).cmp(&(b.title.to_lowercase(), b.id))
        });
        debug!("arranging {} window(s) on {}", windows.len(), monitor.name);

        if let [window] = windows.as_slice() {
            if !wm.is_maximized(window)? {
                wm.maximize_window(window)?;
            }
            continue;
        }

        let shape = grid_shape(windows.len(), &monitor);
        for (window, cell) in windows.iter().zip(cells(&monitor, shape)) {
            if let Err(e) = place(wm, window, &cell) {
                warn!("failed to place {:?} ({}): {}", window.title, window.id, e);
            }
        }
    }
    Ok(())
}

fn place<S: WindowSystem>(
    wm: &WindowManager<S>,
    window: &Window,
    cell: &Rect,
) -> Result<(), ManagerError> {
    wm.resize_window(window, cell.width, cell.height)?;
    wm.move_window_to(window, cell.x, cell.y)
}
