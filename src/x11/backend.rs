//! [`WindowSystem`] implementation backed by wmctrl, xdotool and xrandr.
//!
//! Every operation is one blocking subprocess call.  Queries parse the
//! tools' line-oriented text output into [`Window`] / [`Monitor`]
//! snapshots; mutations infer success from the child's exit status.
//!
//! Output formats this module depends on:
//!
//! ```text
//! $ wmctrl -lG
//! 0x03a00007  0 3849 138  1789 1080 myhost Mozilla Firefox
//!
//! $ xrandr --current
//! DP-1 connected primary 1920x1080+0+0 (normal left inverted right) 597mm x 336mm
//!
//! $ xdotool getactivewindow
//! 60817415
//! ```

use crate::config::Config;
use crate::exec::{self, ExecError};
use crate::model::{Monitor, Window, WindowId};
use crate::traits::WindowSystem;
use log::warn;
use std::path::PathBuf;

/// Command-line-tool backed window system.
///
/// Holds the resolved paths of the three tools plus the title prefixes to
/// exclude from enumeration.  No other state: every query re-runs the
/// tools and every snapshot is independent.
#[derive(Debug)]
pub struct X11Cli {
    wmctrl: PathBuf,
    xdotool: PathBuf,
    xrandr: PathBuf,
    skip_title_prefixes: Vec<String>,
}

/// Errors that can occur when talking to the window system.
#[derive(Debug, thiserror::Error)]
pub enum X11Error {
    /// A required tool is not installed.
    #[error("{tool} not found on PATH")]
    ToolNotFound {
        tool: &'static str,
        #[source]
        source: which::Error,
    },

    /// Running a tool failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Could not connect to the X display.
    #[error("display connection failed: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    /// An X request could not be sent.
    #[error("display request failed: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    /// The X server rejected a request.
    #[error("display reply failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),
}

fn find_tool(name: &'static str) -> Result<PathBuf, X11Error> {
    which::which(name).map_err(|source| X11Error::ToolNotFound { tool: name, source })
}

fn resolve_tool(name: &'static str, configured: Option<&PathBuf>) -> Result<PathBuf, X11Error> {
    match configured {
        Some(path) => Ok(path.clone()),
        None => find_tool(name),
    }
}

impl X11Cli {
    /// Locate all three tools on `PATH`.
    pub fn discover() -> Result<Self, X11Error> {
        Self::from_config(&Config::default())
    }

    /// Build a backend from configuration, falling back to `PATH`
    /// discovery for any tool without a configured path.
    pub fn from_config(config: &Config) -> Result<Self, X11Error> {
        Ok(Self {
            wmctrl: resolve_tool("wmctrl", config.tools.wmctrl.as_ref())?,
            xdotool: resolve_tool("xdotool", config.tools.xdotool.as_ref())?,
            xrandr: resolve_tool("xrandr", config.tools.xrandr.as_ref())?,
            skip_title_prefixes: config.windows.skip_title_prefixes.clone(),
        })
    }

    fn wmctrl_window(&self, id: WindowId, args: &[&str]) -> Result<(), X11Error> {
        let id = id.to_string();
        let mut full = vec!["-ir", id.as_str()];
        full.extend_from_slice(args);
        exec::run(&self.wmctrl, &full)?;
        Ok(())
    }
}

//  Parsers

/// Parse one `wmctrl -lG` line into a window snapshot.
///
/// The line carries seven whitespace-separated fields (id, desktop, x, y,
/// width, height, host) followed by the title, which may itself contain
/// whitespace.  Returns `None` for lines that do not match.
fn parse_window_line(line: &str) -> Option<Window> {
    let mut rest = line.trim_start();
    let mut fields = [""; 7];
    for slot in fields.iter_mut() {
        let end = rest.find(char::is_whitespace)?;
        *slot = &rest[..end];
        rest = rest[end..].trim_start();
    }
    if rest.is_empty() {
        return None;
    }
    let [id, _desktop, x, y, width, height, _host] = fields;
    Some(Window {
        id: id.parse().ok()?,
        title: rest.trim_end().to_string(),
        x: x.parse().ok()?,
        y: y.parse().ok()?,
        width: width.parse().ok()?,
        height: height.parse().ok()?,
        is_active: false,
    })
}

/// Parse the full `wmctrl -lG` output, marking the active window and
/// dropping skipped titles.  Malformed lines are logged and skipped.
fn parse_client_list(output: &str, active: Option<WindowId>, skip: &[String]) -> Vec<Window> {
    let mut windows = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_window_line(line) {
            Some(mut window) => {
                if skip.iter().any(|prefix| window.title.starts_with(prefix)) {
                    continue;
                }
                window.is_active = active == Some(window.id);
                windows.push(window);
            }
            None => warn!("unexpected wmctrl output: {}", line),
        }
    }
    windows
}

/// Parse a `WxH+X+Y` geometry token.
fn parse_geometry(token: &str) -> Option<(i32, i32, u32, u32)> {
    let (size, position) = token.split_once('+')?;
    let (x, y) = position.split_once('+')?;
    let (width, height) = size.split_once('x')?;
    Some((
        x.parse().ok()?,
        y.parse().ok()?,
        width.parse().ok()?,
        height.parse().ok()?,
    ))
}

/// Parse `xrandr --current` output into monitor snapshots.
///
/// Only lines for connected outputs are considered; the geometry is the
/// first token of the form `WxH+X+Y`.  Ids are assigned sequentially in
/// output order.  Connected outputs without a parsable geometry (e.g. an
/// output that is connected but off) are logged and skipped.
fn parse_monitors(output: &str) -> Vec<Monitor> {
    let mut monitors = Vec::new();
    for line in output.lines() {
        if !line.contains(" connected") {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        let mut primary = false;
        let mut geometry = None;
        for token in tokens {
            if token == "primary" {
                primary = true;
            }
            if geometry.is_none() && token.contains('x') && token.contains('+') {
                geometry = parse_geometry(token);
            }
        }
        match geometry {
            Some((x, y, width, height)) => monitors.push(Monitor {
                id: monitors.len() as u32,
                name: name.to_string(),
                x,
                y,
                width,
                height,
                primary,
            }),
            None => warn!("could not parse geometry for monitor {}", name),
        }
    }
    monitors
}

//  WindowSystem implementation

impl WindowSystem for X11Cli {
    type Error = X11Error;

    fn monitors(&self) -> Result<Vec<Monitor>, X11Error> {
        let output = exec::run(&self.xrandr, &["--current"])?;
        Ok(parse_monitors(&output))
    }

    fn windows(&self) -> Result<Vec<Window>, X11Error> {
        let active = self.active_window_id()?;
        let output = exec::run(&self.wmctrl, &["-lG"])?;
        Ok(parse_client_list(&output, active, &self.skip_title_prefixes))
    }

    fn active_window_id(&self) -> Result<Option<WindowId>, X11Error> {
        // xdotool exits nonzero when nothing has focus; that is an absent
        // result, not an environment failure.
        let output = match exec::run(&self.xdotool, &["getactivewindow"]) {
            Ok(output) => output,
            Err(ExecError::Failed { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let raw = output.trim();
        match raw.parse::<u32>() {
            Ok(id) => Ok(Some(WindowId(id))),
            Err(_) => {
                warn!("invalid window id from xdotool: {:?}", raw);
                Ok(None)
            }
        }
    }

    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), X11Error> {
        self.wmctrl_window(id, &["-e", &format!("0,{},{},-1,-1", x, y)])
    }

    fn resize_window(&self, id: WindowId, width: u32, height: u32) -> Result<(), X11Error> {
        self.wmctrl_window(id, &["-e", &format!("0,-1,-1,{},{}", width, height)])
    }

    fn focus_window(&self, id: WindowId) -> Result<(), X11Error> {
        exec::run(&self.wmctrl, &["-ia", &id.to_string()])?;
        Ok(())
    }

    fn close_window(&self, id: WindowId) -> Result<(), X11Error> {
        exec::run(&self.wmctrl, &["-ic", &id.to_string()])?;
        Ok(())
    }

    fn minimize_window(&self, id: WindowId) -> Result<(), X11Error> {
        exec::run(&self.xdotool, &["windowminimize", &id.to_string()])?;
        Ok(())
    }

    fn maximize_window(&self, id: WindowId) -> Result<(), X11Error> {
        self.wmctrl_window(id, &["-b", "add,maximized_vert,maximized_horz"])
    }

    fn unmaximize_window(&self, id: WindowId) -> Result<(), X11Error> {
        self.wmctrl_window(id, &["-b", "remove,maximized_vert,maximized_horz"])
    }

    fn is_maximized(&self, id: WindowId) -> Result<bool, X11Error> {
        super::ewmh::window_is_maximized(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WMCTRL_OUTPUT: &str = "\
0x03a00007  0 0    37   960  1043 myhost Mozilla Firefox
0x04200003  0 960  37   960  1043 myhost kitty
0x04600021 -1 3849 138  1789 1080 myhost Desktop — Plasma
0x04a00004  0 -120 500  640  480  myhost Editor — notes.txt
garbage line
0x05000001  0 10 20 300";

    const XRANDR_OUTPUT: &str = "\
Screen 0: minimum 320 x 200, current 3840 x 1080, maximum 16384 x 16384
DP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 597mm x 336mm
   1920x1080     60.00*+  50.00
   1280x720      60.00
HDMI-A-1 connected 1920x1080+1920+0 (normal left inverted right x axis y axis) 521mm x 293mm
   1920x1080     60.00*
DP-2 disconnected (normal left inverted right x axis y axis)
DP-3 connected (normal left inverted right x axis y axis)";

    #[test]
    fn parses_window_line_with_spaces_in_title() {
        let w = parse_window_line("0x03a00007  0 3849 138  1789 1080 myhost Mozilla Firefox")
            .unwrap();
        assert_eq!(w.id, WindowId(0x03a00007));
        assert_eq!(w.title, "Mozilla Firefox");
        assert_eq!((w.x, w.y, w.width, w.height), (3849, 138, 1789, 1080));
        assert!(!w.is_active);
    }

    #[test]
    fn parses_negative_position() {
        let w = parse_window_line("0x04a00004  0 -120 500  640  480  myhost Editor").unwrap();
        assert_eq!((w.x, w.y), (-120, 500));
    }

    #[test]
    fn rejects_short_and_malformed_lines() {
        assert!(parse_window_line("garbage line").is_none());
        assert!(parse_window_line("0x05000001  0 10 20 300").is_none());
        assert!(parse_window_line("").is_none());
        // Non-numeric geometry field.
        assert!(parse_window_line("0x1 0 a 20 300 400 host title").is_none());
    }

    #[test]
    fn client_list_skips_malformed_and_filtered_lines() {
        let skip = vec!["Desktop — Plasma".to_string(), "Plasma".to_string()];
        let windows = parse_client_list(WMCTRL_OUTPUT, None, &skip);
        let titles: Vec<&str> = windows.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Mozilla Firefox", "kitty", "Editor — notes.txt"]
        );
    }

    #[test]
    fn client_list_marks_active_window() {
        let windows = parse_client_list(WMCTRL_OUTPUT, Some(WindowId(0x04200003)), &[]);
        let active: Vec<&Window> = windows.iter().filter(|w| w.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "kitty");
    }

    #[test]
    fn client_list_without_active_id_marks_nothing() {
        let windows = parse_client_list(WMCTRL_OUTPUT, None, &[]);
        assert!(windows.iter().all(|w| !w.is_active));
    }

    #[test]
    fn parses_connected_monitors_only() {
        let monitors = parse_monitors(XRANDR_OUTPUT);
        assert_eq!(monitors.len(), 2);

        assert_eq!(monitors[0].name, "DP-1");
        assert_eq!(monitors[0].id, 0);
        assert!(monitors[0].primary);
        assert_eq!(
            (
                monitors[0].x,
                monitors[0].y,
                monitors[0].width,
                monitors[0].height
            ),
            (0, 0, 1920, 1080)
        );

        assert_eq!(monitors[1].name, "HDMI-A-1");
        assert_eq!(monitors[1].id, 1);
        assert!(!monitors[1].primary);
        assert_eq!((monitors[1].x, monitors[1].y), (1920, 0));
    }

    #[test]
    fn connected_output_without_geometry_is_skipped() {
        // DP-3 is connected but off, so it has no geometry token.
        let monitors = parse_monitors(XRANDR_OUTPUT);
        assert!(monitors.iter().all(|m| m.name != "DP-3"));
    }

    #[test]
    fn geometry_token_parses() {
        assert_eq!(parse_geometry("1920x1080+0+0"), Some((0, 0, 1920, 1080)));
        assert_eq!(
            parse_geometry("2560x1440+1920+360"),
            Some((1920, 360, 2560, 1440))
        );
        assert_eq!(parse_geometry("1920x1080"), None);
        assert_eq!(parse_geometry("60.00*+"), None);
    }

    #[test]
    fn config_path_overrides_skip_discovery() {
        let mut config = Config::default();
        config.tools.wmctrl = Some(PathBuf::from("/opt/tools/wmctrl"));
        config.tools.xdotool = Some(PathBuf::from("/opt/tools/xdotool"));
        config.tools.xrandr = Some(PathBuf::from("/opt/tools/xrandr"));
        let backend = X11Cli::from_config(&config).unwrap();
        assert_eq!(backend.wmctrl, PathBuf::from("/opt/tools/wmctrl"));
        assert_eq!(backend.xdotool, PathBuf::from("/opt/tools/xdotool"));
        assert_eq!(backend.xrandr, PathBuf::from("/opt/tools/xrandr"));
    }
}
