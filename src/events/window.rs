use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор окна в оконном менеджере (con_id в Sway, XID в X11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Снимок состояния окна на момент срабатывания горячей клавиши.
/// Ядро никогда не изменяет снимки - только читает.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub class: String,
    pub title: String,
    pub focused: bool,
    pub monitor: i32,
    pub workspace: i32,
    pub geometry: Option<WindowGeometry>,
}

impl WindowSnapshot {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: WindowId(id),
            class: String::new(),
            title: title.into(),
            focused: false,
            monitor: 0,
            workspace: 0,
            geometry: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn on_monitor(mut self, monitor: i32) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn on_workspace(mut self, workspace: i32) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn with_geometry(mut self, geometry: WindowGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

impl fmt::Display for WindowSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "{} \"{}\"", self.id, self.title)
        } else {
            write!(f, "{} \"{}\" ({})", self.id, self.title, self.class)
        }
    }
}

/// Геометрия окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }
}

/// Область, из которой берётся список окон
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowScope {
    AllWorkspaces,
    ActiveWorkspace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_snapshot_builder() {
        let window = WindowSnapshot::new(42, "Vim - file.txt")
            .with_class("Gvim")
            .with_focus(true)
            .on_monitor(1)
            .on_workspace(3);

        assert_eq!(window.id, WindowId(42));
        assert_eq!(window.class, "Gvim");
        assert!(window.focused);
        assert_eq!(window.monitor, 1);
        assert_eq!(window.workspace, 3);
        assert_eq!(window.to_string(), "0x0000002a \"Vim - file.txt\" (Gvim)");
    }

    #[test]
    fn test_geometry_center() {
        let geometry = WindowGeometry { x: 100, y: 50, width: 800, height: 600 };
        assert_eq!(geometry.center(), (500, 350));
    }
}
