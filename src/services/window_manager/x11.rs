use crate::error::Result;
use crate::events::{WindowGeometry, WindowScope, WindowSnapshot};
use crate::ror_error;
use tracing::debug;

use super::r#trait::{run_tool, WindowManager};

/// Окно, видимое на всех рабочих столах (`wmctrl` печатает -1)
const STICKY: i32 = -1;

/// X11 через `wmctrl`, `xdotool` и `xprop`.
///
/// Порядок MRU приближается обратным порядком `_NET_CLIENT_LIST_STACKING`.
/// Номер монитора X11 не сообщает, поэтому все окна считаются на мониторе 0.
pub struct X11WindowManager;

impl X11WindowManager {
    pub fn new() -> Self {
        Self
    }

    fn active_desktop(&self) -> Result<i32> {
        let stdout = run_tool("wmctrl", &["-d"])?;
        parse_active_desktop(&stdout).ok_or_else(|| ror_error!(window, "активный рабочий стол не найден"))
    }

    fn active_window(&self) -> Option<u64> {
        run_tool("xdotool", &["getactivewindow"])
            .ok()
            .and_then(|out| out.trim().parse().ok())
    }
}

impl WindowManager for X11WindowManager {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn list_windows(&self, scope: WindowScope) -> Result<Vec<WindowSnapshot>> {
        let listing = run_tool("wmctrl", &["-lxG"])?;
        let stacking = run_tool("xprop", &["-root", "_NET_CLIENT_LIST_STACKING"])
            .map(|out| parse_stacking(&out))
            .unwrap_or_default();
        let active = self.active_window();

        let mut windows = order_by_stacking(parse_wmctrl_list(&listing), &stacking);
        for window in &mut windows {
            window.focused = Some(window.id.0) == active;
        }

        if scope == WindowScope::ActiveWorkspace {
            let desktop = self.active_desktop()?;
            windows.retain(|w| w.workspace == desktop || w.workspace == STICKY);
        }

        debug!("X11: {} окон", windows.len());
        Ok(windows)
    }

    fn focus(&self, window: &WindowSnapshot) -> Result<()> {
        run_tool("wmctrl", &["-ia", &window.id.to_string()]).map(|_| ())
    }

    fn minimize(&self, window: &WindowSnapshot) -> Result<()> {
        run_tool("xdotool", &["windowminimize", &window.id.0.to_string()]).map(|_| ())
    }

    fn move_to_active_workspace(&self, window: &WindowSnapshot) -> Result<()> {
        let desktop = self.active_desktop()?;
        run_tool(
            "wmctrl",
            &["-ir", &window.id.to_string(), "-t", &desktop.to_string()],
        )
        .map(|_| ())
    }

    fn center_pointer_on(&self, window: &WindowSnapshot) -> Result<()> {
        let geometry = window
            .geometry
            .ok_or_else(|| ror_error!(window, "у окна {} нет геометрии", window))?;
        let (x, y) = geometry.center();
        run_tool("xdotool", &["mousemove", &x.to_string(), &y.to_string()]).map(|_| ())
    }
}

/// Строки `wmctrl -lxG`: `id desktop x y w h instance.Class host title…`.
/// Заголовок берётся как есть, вместе с повторяющимися пробелами.
fn parse_wmctrl_list(stdout: &str) -> Vec<WindowSnapshot> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut rest = line;
            let mut next = || {
                let (field, tail) = next_field(rest)?;
                rest = tail;
                Some(field)
            };
            let id = parse_hex(next()?)?;
            let desktop: i32 = next()?.parse().ok()?;
            let x: i32 = next()?.parse().ok()?;
            let y: i32 = next()?.parse().ok()?;
            let width: u32 = next()?.parse().ok()?;
            let height: u32 = next()?.parse().ok()?;
            let class = next()?;
            let _host = next();
            // wmctrl отделяет заголовок от имени хоста одним пробелом
            let title = rest.strip_prefix(' ').unwrap_or(rest);

            Some(
                WindowSnapshot::new(id, title)
                    .with_class(class)
                    .on_workspace(desktop)
                    .with_geometry(WindowGeometry { x, y, width, height }),
            )
        })
        .collect()
}

/// `_NET_CLIENT_LIST_STACKING(WINDOW): window id # 0x1a00003, 0x3a00003` - снизу вверх
/// Следующее поле после пробелов выравнивания и остаток строки за ним
fn next_field(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }
    let end = line.find(char::is_whitespace).unwrap_or(line.len());
    Some(line.split_at(end))
}

fn parse_stacking(stdout: &str) -> Vec<u64> {
    stdout
        .split_once('#')
        .map(|(_, ids)| ids.split(',').filter_map(|id| parse_hex(id.trim())).collect())
        .unwrap_or_default()
}

fn parse_active_desktop(stdout: &str) -> Option<i32> {
    stdout.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let number = parts.next()?;
        (parts.next()? == "*").then(|| number.parse().ok()).flatten()
    })
}

fn parse_hex(text: &str) -> Option<u64> {
    u64::from_str_radix(text.trim_start_matches("0x"), 16).ok()
}

/// Верх стека - самое свежее окно. Окна вне стека идут в конце.
fn order_by_stacking(mut windows: Vec<WindowSnapshot>, stacking: &[u64]) -> Vec<WindowSnapshot> {
    windows.sort_by_key(|w| {
        stacking
            .iter()
            .rev()
            .position(|id| *id == w.id.0)
            .unwrap_or(usize::MAX)
    });
    windows
}
