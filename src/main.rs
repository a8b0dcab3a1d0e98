//! Entry point for the **wmosaic** command-line tool.
//!
//! Thin dispatch layer: every subcommand resolves its window or monitor
//! through the [`WindowManager`](wmosaic::manager::WindowManager) facade
//! and performs exactly one operation.  Exit status 1 means the operation
//! (or the lookup before it) failed; lookups print a message rather than
//! a parse error when nothing matches.

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{info, warn};
use wmosaic::config::Config;
use wmosaic::manager::WindowManager;
use wmosaic::model::{Monitor, Window};
use wmosaic::mosaic;
use wmosaic::traits::WindowSystem;
use wmosaic::x11::X11Cli;

/// Resolve the config directory (`$XDG_CONFIG_HOME/wmosaic`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("wmosaic")
}

/// Try to load the config from `$XDG_CONFIG_HOME/wmosaic/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  CLI definition

fn build_cli() -> Command {
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a listing");
    let title = Arg::new("title")
        .required(true)
        .help("Window title substring (case-insensitive, first match wins)");

    Command::new("wmosaic")
        .about("Query and arrange X11 windows through wmctrl, xdotool and xrandr")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("windows")
                .about("List all windows")
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("monitors")
                .about("List connected monitors")
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("active")
                .about("Show the focused window")
                .arg(json.clone()),
        )
        .subcommand(Command::new("focus").about("Focus a window").arg(title.clone()))
        .subcommand(Command::new("close").about("Close a window").arg(title.clone()))
        .subcommand(
            Command::new("minimize")
                .about("Minimize a window")
                .arg(title.clone()),
        )
        .subcommand(
            Command::new("maximize")
                .about("Maximize a window")
                .arg(title.clone()),
        )
        .subcommand(
            Command::new("unmaximize")
                .about("Unmaximize a window")
                .arg(title.clone()),
        )
        .subcommand(
            Command::new("move")
                .about("Move a window to an absolute position")
                .arg(title.clone())
                .arg(
                    Arg::new("x")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(clap::value_parser!(i32)),
                )
                .arg(
                    Arg::new("y")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(clap::value_parser!(i32)),
                ),
        )
        .subcommand(
            Command::new("resize")
                .about("Resize a window")
                .arg(title.clone())
                .arg(
                    Arg::new("width")
                        .required(true)
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("height")
                        .required(true)
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("send")
                .about("Move a window to another monitor, keeping its offset")
                .arg(title.clone())
                .arg(
                    Arg::new("monitor")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .help("Target monitor id (see `wmosaic monitors`)"),
                ),
        )
        .subcommand(Command::new("layout").about("Show windows grouped by monitor"))
        .subcommand(
            Command::new("mosaic").about("Tile every monitor's windows into an even grid"),
        )
}

//  Main

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let matches = build_cli().get_matches();

    let config = load_config();
    let wm = WindowManager::new(X11Cli::from_config(&config)?);

    match matches.subcommand() {
        Some(("windows", sub)) => cmd_windows(&wm, sub),
        Some(("monitors", sub)) => cmd_monitors(&wm, sub),
        Some(("active", sub)) => cmd_active(&wm, sub),
        Some(("focus", sub)) => {
            let window = resolve_window(&wm, sub)?;
            wm.focus_window(&window)?;
            Ok(())
        }
        Some(("close", sub)) => {
            let window = resolve_window(&wm, sub)?;
            wm.close_window(&window)?;
            Ok(())
        }
        Some(("minimize", sub)) => {
            let window = resolve_window(&wm, sub)?;
            wm.minimize_window(&window)?;
            Ok(())
        }
        Some(("maximize", sub)) => {
            let window = resolve_window(&wm, sub)?;
            wm.maximize_window(&window)?;
            Ok(())
        }
        Some(("unmaximize", sub)) => {
            let window = resolve_window(&wm, sub)?;
            wm.unmaximize_window(&window)?;
            Ok(())
        }
        Some(("move", sub)) => {
            let window = resolve_window(&wm, sub)?;
            let x = *arg::<i32>(sub, "x")?;
            let y = *arg::<i32>(sub, "y")?;
            wm.move_window_to(&window, x, y)?;
            Ok(())
        }
        Some(("resize", sub)) => {
            let window = resolve_window(&wm, sub)?;
            let width = *arg::<u32>(sub, "width")?;
            let height = *arg::<u32>(sub, "height")?;
            wm.resize_window(&window, width, height)?;
            Ok(())
        }
        Some(("send", sub)) => cmd_send(&wm, sub),
        Some(("layout", _)) => cmd_layout(&wm),
        Some(("mosaic", _)) => {
            mosaic::arrange(&wm)?;
            Ok(())
        }
        _ => Err("unknown command".into()),
    }
}

//  Subcommand handlers

fn cmd_windows<S: WindowSystem>(
    wm: &WindowManager<S>,
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let windows = wm.list_windows()?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&windows)?);
    } else if windows.is_empty() {
        println!("no windows");
    } else {
        for window in &windows {
            println!("{}", format_window(window));
        }
    }
    Ok(())
}

fn cmd_monitors<S: WindowSystem>(
    wm: &WindowManager<S>,
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let monitors = wm.list_monitors()?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&monitors)?);
    } else if monitors.is_empty() {
        println!("no monitors");
    } else {
        for monitor in &monitors {
            println!("{}", format_monitor(monitor));
        }
    }
    Ok(())
}

fn cmd_active<S: WindowSystem>(
    wm: &WindowManager<S>,
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    match wm.get_active_window()? {
        Some(window) if matches.get_flag("json") => {
            println!("{}", serde_json::to_string_pretty(&window)?);
        }
        Some(window) => println!("{}", format_window(&window)),
        None => println!("no active window"),
    }
    Ok(())
}

fn cmd_send<S: WindowSystem>(
    wm: &WindowManager<S>,
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let window = resolve_window(wm, matches)?;
    let monitor_id = *arg::<u32>(matches, "monitor")?;
    let Some(target) = wm.get_monitor_by_id(monitor_id)? else {
        return Err(format!("no monitor with id {}", monitor_id).into());
    };

    let (x, y) = wm.move_to_monitor(&window, &target)?;
    if wm.verify_move(&window, &target, x, y)? {
        println!("moved {:?} to {} at ({}, {})", window.title, target.name, x, y);
    } else {
        warn!(
            "window {:?} did not settle at ({}, {}) on {}",
            window.title, x, y, target.name
        );
    }
    Ok(())
}

fn cmd_layout<S: WindowSystem>(
    wm: &WindowManager<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    for (monitor, windows) in wm.windows_by_monitor()? {
        println!("{}", format_monitor(&monitor));
        for window in &windows {
            println!("  {}", format_window(window));
        }
    }
    Ok(())
}

//  Helpers

fn arg<'a, T: Clone + Send + Sync + 'static>(
    matches: &'a ArgMatches,
    name: &str,
) -> Result<&'a T, Box<dyn std::error::Error>> {
    matches
        .get_one::<T>(name)
        .ok_or_else(|| format!("missing argument: {}", name).into())
}

fn resolve_window<S: WindowSystem>(
    wm: &WindowManager<S>,
    matches: &ArgMatches,
) -> Result<Window, Box<dyn std::error::Error>> {
    let title = arg::<String>(matches, "title")?;
    match wm.get_window_by_name(title)? {
        Some(window) => Ok(window),
        None => Err(format!("no window matching {:?}", title).into()),
    }
}

fn format_window(w: &Window) -> String {
    format!(
        "{:>12}  {:>5},{:<6} {:>4}x{:<5} {}{}",
        w.id.to_string(),
        w.x,
        w.y,
        w.width,
        w.height,
        w.title,
        if w.is_active { "  (active)" } else { "" }
    )
}

fn format_monitor(m: &Monitor) -> String {
    format!(
        "[{}] {}  {:>5},{:<6} {:>4}x{:<5}{}",
        m.id,
        m.name,
        m.x,
        m.y,
        m.width,
        m.height,
        if m.primary { "  (primary)" } else { "" }
    )
}
