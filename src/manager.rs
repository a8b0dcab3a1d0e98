//! The high-level facade over a [`WindowSystem`] backend.
//!
//! [`WindowManager`] adds the derived operations the raw backend does not
//! have: lookups by title or id, window-to-monitor mapping, and the
//! offset-preserving [`move_to_monitor`](WindowManager::move_to_monitor).
//!
//! Lookups that find nothing return `Ok(None)`; only environment failures
//! (a tool missing, a command exiting nonzero) surface as errors.

use crate::model::{Monitor, Window, WindowId};
use crate::traits::WindowSystem;
use log::debug;

/// Position tolerance (pixels) when verifying that a window settled where
/// it was sent.  Window-manager frame decoration shifts the reported
/// position by a few pixels on most desktops.
const MOVE_TOLERANCE: i32 = 10;

/// Possible errors from the facade.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The window system returned an error.
    #[error("window system error: {0}")]
    System(String),
}

/// High-level accessor and mutator over window-system state.
///
/// The manager is generic over any [`WindowSystem`] implementation, making
/// it independent of the wmctrl/xdotool backend; tests run it against an
/// in-memory mock.
///
/// # Typical usage
///
/// ```ignore
/// let wm = WindowManager::new(X11Cli::discover()?);
/// if let Some(window) = wm.get_window_by_name("firefox")? {
///     wm.focus_window(&window)?;
/// }
/// ```
pub struct WindowManager<S: WindowSystem> {
    system: S,
}

impl<S: WindowSystem> WindowManager<S> {
    /// Create a new facade over `system`.
    pub fn new(system: S) -> Self {
        Self { system }
    }

    /// Return a shared reference to the underlying window system.
    pub fn system(&self) -> &S {
        &self.system
    }

    fn sys_err(e: S::Error) -> ManagerError {
        ManagerError::System(e.to_string())
    }

    //  Queries

    /// A fresh snapshot of all managed windows.
    pub fn list_windows(&self) -> Result<Vec<Window>, ManagerError> {
        self.system.windows().map_err(Self::sys_err)
    }

    /// All monitors, sorted by name.
    pub fn list_monitors(&self) -> Result<Vec<Monitor>, ManagerError> {
        let mut monitors = self.system.monitors().map_err(Self::sys_err)?;
        monitors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(monitors)
    }

    /// The focused window, or `None` if nothing has focus.
    pub fn get_active_window(&self) -> Result<Option<Window>, ManagerError> {
        match self.system.active_window_id().map_err(Self::sys_err)? {
            Some(id) => self.get_window_by_id(id),
            None => Ok(None),
        }
    }

    /// The first window whose title contains `name`, case-insensitively.
    pub fn get_window_by_name(&self, name: &str) -> Result<Option<Window>, ManagerError> {
        let needle = name.to_lowercase();
        Ok(self
            .list_windows()?
            .into_iter()
            .find(|w| w.title.to_lowercase().contains(&needle)))
    }

    /// The window with the given id, if it still exists.
    pub fn get_window_by_id(&self, id: WindowId) -> Result<Option<Window>, ManagerError> {
        Ok(self.list_windows()?.into_iter().find(|w| w.id == id))
    }

    /// The monitor with the given id.
    pub fn get_monitor_by_id(&self, id: u32) -> Result<Option<Monitor>, ManagerError> {
        Ok(self.list_monitors()?.into_iter().find(|m| m.id == id))
    }

    /// The monitor whose bounds contain the window's top-left corner.
    ///
    /// Advisory only: window and monitor geometry come from different
    /// tools and can disagree, and a window can sit outside every monitor.
    pub fn monitor_for_window(&self, window: &Window) -> Result<Option<Monitor>, ManagerError> {
        Ok(self
            .system
            .monitors()
            .map_err(Self::sys_err)?
            .into_iter()
            .find(|m| m.contains(window.x, window.y)))
    }

    /// The current window snapshot grouped by containing monitor, in
    /// [`list_monitors`](Self::list_monitors) order.
    ///
    /// Windows that lie on no known monitor are not included.
    pub fn windows_by_monitor(&self) -> Result<Vec<(Monitor, Vec<Window>)>, ManagerError> {
        let monitors = self.list_monitors()?;
        let windows = self.list_windows()?;
        Ok(monitors
            .into_iter()
            .map(|monitor| {
                let on_monitor = windows
                    .iter()
                    .filter(|w| monitor.contains(w.x, w.y))
                    .cloned()
                    .collect();
                (monitor, on_monitor)
            })
            .collect())
    }

    //  Mutations

    /// Move the window's top-left corner to `(x, y)`.
    pub fn move_window_to(&self, window: &Window, x: i32, y: i32) -> Result<(), ManagerError> {
        debug!("move {} to ({}, {})", window.id, x, y);
        self.system
            .move_window(window.id, x, y)
            .map_err(Self::sys_err)
    }

    /// Resize the window, unmaximizing it first so the new size sticks.
    pub fn resize_window(
        &self,
        window: &Window,
        width: u32,
        height: u32,
    ) -> Result<(), ManagerError> {
        debug!("resize {} to {}x{}", window.id, width, height);
        self.system
            .unmaximize_window(window.id)
            .map_err(Self::sys_err)?;
        self.system
            .resize_window(window.id, width, height)
            .map_err(Self::sys_err)
    }

    /// Give the window input focus.
    pub fn focus_window(&self, window: &Window) -> Result<(), ManagerError> {
        self.system.focus_window(window.id).map_err(Self::sys_err)
    }

    /// Ask the window manager to close the window.
    pub fn close_window(&self, window: &Window) -> Result<(), ManagerError> {
        self.system.close_window(window.id).map_err(Self::sys_err)
    }

    /// Iconify the window.
    pub fn minimize_window(&self, window: &Window) -> Result<(), ManagerError> {
        self.system.minimize_window(window.id).map_err(Self::sys_err)
    }

    /// Maximize the window in both directions.
    pub fn maximize_window(&self, window: &Window) -> Result<(), ManagerError> {
        self.system.maximize_window(window.id).map_err(Self::sys_err)
    }

    /// Clear both maximization states.
    pub fn unmaximize_window(&self, window: &Window) -> Result<(), ManagerError> {
        self.system
            .unmaximize_window(window.id)
            .map_err(Self::sys_err)
    }

    /// Whether the window is currently maximized in both directions.
    pub fn is_maximized(&self, window: &Window) -> Result<bool, ManagerError> {
        self.system.is_maximized(window.id).map_err(Self::sys_err)
    }

    /// Move the window to `target`, preserving its offset relative to its
    /// source monitor's origin and clamping so the window rests fully
    /// inside the target bounds.
    ///
    /// A window that lies on no known monitor keeps offset `(0, 0)`.  A
    /// maximized window is unmaximized for the move and re-maximized on
    /// the target.  Returns the position that was requested.
    pub fn move_to_monitor(
        &self,
        window: &Window,
        target: &Monitor,
    ) -> Result<(i32, i32), ManagerError> {
        debug!("move {} to monitor {} ({})", window.id, target.id, target.name);

        let was_maximized = self.is_maximized(window)?;
        if was_maximized {
            self.unmaximize_window(window)?;
        }

        let (offset_x, offset_y) = match self.monitor_for_window(window)? {
            Some(source) => (window.x - source.x, window.y - source.y),
            None => (0, 0),
        };

        // Largest position that keeps the window inside the target; for a
        // window larger than the monitor this is left of the origin, and
        // the final max() pins the window to the origin instead.
        let max_x = target.x + target.width as i32 - window.width as i32;
        let max_y = target.y + target.height as i32 - window.height as i32;
        let x = (target.x + offset_x).min(max_x).max(target.x);
        let y = (target.y + offset_y).min(max_y).max(target.y);

        self.move_window_to(window, x, y)?;

        if was_maximized {
            self.maximize_window(window)?;
        }
        Ok((x, y))
    }

    /// Re-query the window and check that it sits on `target` within a
    /// few pixels of the expected position.
    ///
    /// Returns `Ok(false)` when the window disappeared, landed on another
    /// monitor, or drifted beyond the tolerance.
    pub fn verify_move(
        &self,
        window: &Window,
        target: &Monitor,
        expected_x: i32,
        expected_y: i32,
    ) -> Result<bool, ManagerError> {
        let Some(updated) = self.get_window_by_id(window.id)? else {
            return Ok(false);
        };
        let on_target =
            self.monitor_for_window(&updated)?.map(|m| m.id) == Some(target.id);
        Ok(on_target
            && (updated.x - expected_x).abs() <= MOVE_TOLERANCE
            && (updated.y - expected_y).abs() <= MOVE_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mock::{Call, MockWm};

    fn monitor(id: u32, name: &str, x: i32, y: i32) -> Monitor {
        Monitor {
            id,
            name: name.into(),
            x,
            y,
            width: 1920,
            height: 1080,
            primary: id == 0,
        }
    }

    fn window(id: u32, title: &str, x: i32, y: i32, width: u32, height: u32) -> Window {
        Window {
            id: WindowId(id),
            title: title.into(),
            x,
            y,
            width,
            height,
            is_active: false,
        }
    }

    fn two_monitor_setup(windows: Vec<Window>) -> WindowManager<MockWm> {
        let monitors = vec![monitor(0, "DP-1", 0, 0), monitor(1, "HDMI-A-1", 1920, 0)];
        WindowManager::new(MockWm::new(monitors, windows))
    }

    #[test]
    fn get_window_by_name_is_a_case_insensitive_substring_match() {
        let wm = two_monitor_setup(vec![
            window(1, "Mozilla Firefox", 0, 0, 800, 600),
            window(2, "kitty", 960, 0, 800, 600),
        ]);
        let found = wm.get_window_by_name("firefox").unwrap().unwrap();
        assert_eq!(found.id, WindowId(1));
        assert!(wm.get_window_by_name("emacs").unwrap().is_none());
    }

    #[test]
    fn get_window_by_name_returns_first_match() {
        let wm = two_monitor_setup(vec![
            window(1, "notes A", 0, 0, 100, 100),
            window(2, "notes B", 0, 0, 100, 100),
        ]);
        assert_eq!(
            wm.get_window_by_name("notes").unwrap().unwrap().id,
            WindowId(1)
        );
    }

    #[test]
    fn get_window_by_name_is_idempotent_over_unchanged_state() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 0, 0, 800, 600)]);
        let first = wm.get_window_by_name("kitty").unwrap();
        let second = wm.get_window_by_name("kitty").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn active_window_absent_when_nothing_focused() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 0, 0, 800, 600)]);
        assert!(wm.get_active_window().unwrap().is_none());
    }

    #[test]
    fn active_window_resolved_by_id() {
        let monitors = vec![monitor(0, "DP-1", 0, 0)];
        let mut mock = MockWm::new(monitors, vec![window(7, "kitty", 0, 0, 800, 600)]);
        mock.active = Some(WindowId(7));
        let wm = WindowManager::new(mock);
        assert_eq!(
            wm.get_active_window().unwrap().unwrap().title,
            "kitty"
        );
    }

    #[test]
    fn monitors_are_sorted_by_name() {
        let monitors = vec![
            monitor(0, "HDMI-A-1", 1920, 0),
            monitor(1, "DP-1", 0, 0),
        ];
        let wm = WindowManager::new(MockWm::new(monitors, vec![]));
        let names: Vec<String> = wm
            .list_monitors()
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["DP-1", "HDMI-A-1"]);
    }

    #[test]
    fn monitor_for_window_uses_top_left_corner() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 2000, 100, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let m = wm.monitor_for_window(&w).unwrap().unwrap();
        assert_eq!(m.name, "HDMI-A-1");
    }

    #[test]
    fn monitor_for_window_absent_outside_all_monitors() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 5000, 5000, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        assert!(wm.monitor_for_window(&w).unwrap().is_none());
    }

    #[test]
    fn windows_by_monitor_groups_in_monitor_order() {
        let wm = two_monitor_setup(vec![
            window(1, "left", 100, 100, 800, 600),
            window(2, "right", 2100, 100, 800, 600),
            window(3, "nowhere", -5000, 0, 800, 600),
        ]);
        let grouped = wm.windows_by_monitor().unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0.name, "DP-1");
        assert_eq!(grouped[0].1.len(), 1);
        assert_eq!(grouped[0].1[0].title, "left");
        assert_eq!(grouped[1].1[0].title, "right");
    }

    #[test]
    fn resize_unmaximizes_first() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 0, 0, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        wm.resize_window(&w, 640, 480).unwrap();
        assert_eq!(
            *wm.system.calls.borrow(),
            vec![
                Call::Unmaximize(WindowId(1)),
                Call::Resize(WindowId(1), 640, 480)
            ]
        );
    }

    #[test]
    fn move_to_monitor_preserves_offset() {
        // Monitor A at (0,0,1920,1080), monitor B at (1920,0,1920,1080);
        // a window at (100,100,800,600) on A lands at (2020,100,800,600).
        let wm = two_monitor_setup(vec![window(1, "kitty", 100, 100, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let target = wm.get_monitor_by_id(1).unwrap().unwrap();

        let (x, y) = wm.move_to_monitor(&w, &target).unwrap();
        assert_eq!((x, y), (2020, 100));

        let moved = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        assert_eq!((moved.x, moved.y, moved.width, moved.height), (2020, 100, 800, 600));
        assert!(target.rect().contains_rect(&moved.rect()));
    }

    #[test]
    fn move_to_monitor_clamps_to_target_bounds() {
        // Offset (1500, 700) would push an 800x600 window past the far
        // edge of the 1920x1080 target.
        let wm = two_monitor_setup(vec![window(1, "kitty", 1500, 700, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let target = wm.get_monitor_by_id(1).unwrap().unwrap();

        let (x, y) = wm.move_to_monitor(&w, &target).unwrap();
        assert_eq!((x, y), (1920 + 1920 - 800, 1080 - 600));

        let moved = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        assert!(target.rect().contains_rect(&moved.rect()));
    }

    #[test]
    fn move_to_monitor_pins_oversized_window_to_origin() {
        let wm = two_monitor_setup(vec![window(1, "wall", 100, 100, 4000, 3000)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let target = wm.get_monitor_by_id(1).unwrap().unwrap();
        let (x, y) = wm.move_to_monitor(&w, &target).unwrap();
        assert_eq!((x, y), (1920, 0));
    }

    #[test]
    fn move_to_monitor_restores_maximized_state() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 0, 0, 1920, 1080)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        wm.maximize_window(&w).unwrap();
        let target = wm.get_monitor_by_id(1).unwrap().unwrap();

        wm.move_to_monitor(&w, &target).unwrap();

        let calls = wm.system.calls.borrow();
        // maximize (setup), unmaximize, move, maximize again
        assert_eq!(calls[0], Call::Maximize(WindowId(1)));
        assert_eq!(calls[1], Call::Unmaximize(WindowId(1)));
        assert!(matches!(calls[2], Call::Move(WindowId(1), _, _)));
        assert_eq!(calls[3], Call::Maximize(WindowId(1)));
        assert!(wm.is_maximized(&w).unwrap());
    }

    #[test]
    fn move_to_monitor_without_source_monitor_uses_target_origin() {
        let wm = two_monitor_setup(vec![window(1, "lost", -5000, -5000, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let target = wm.get_monitor_by_id(0).unwrap().unwrap();
        let (x, y) = wm.move_to_monitor(&w, &target).unwrap();
        assert_eq!((x, y), (0, 0));
    }

    #[test]
    fn verify_move_accepts_settled_window() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 100, 100, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let target = wm.get_monitor_by_id(1).unwrap().unwrap();
        let (x, y) = wm.move_to_monitor(&w, &target).unwrap();
        assert!(wm.verify_move(&w, &target, x, y).unwrap());
    }

    #[test]
    fn verify_move_rejects_drift_beyond_tolerance() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 2020, 100, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let target = wm.get_monitor_by_id(1).unwrap().unwrap();
        // The window is at (2020, 100); expecting it 50 px away fails,
        // expecting it 5 px away is within tolerance.
        assert!(!wm.verify_move(&w, &target, 2070, 100).unwrap());
        assert!(wm.verify_move(&w, &target, 2025, 105).unwrap());
    }

    #[test]
    fn verify_move_rejects_wrong_monitor() {
        let wm = two_monitor_setup(vec![window(1, "kitty", 100, 100, 800, 600)]);
        let w = wm.get_window_by_id(WindowId(1)).unwrap().unwrap();
        let target = wm.get_monitor_by_id(1).unwrap().unwrap();
        assert!(!wm.verify_move(&w, &target, 100, 100).unwrap());
    }

    #[test]
    fn verify_move_rejects_vanished_window() {
        let wm = two_monitor_setup(vec![]);
        let ghost = window(9, "gone", 0, 0, 100, 100);
        let target = wm.get_monitor_by_id(0).unwrap().unwrap();
        assert!(!wm.verify_move(&ghost, &target, 0, 0).unwrap());
    }
}
