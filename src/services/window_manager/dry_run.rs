use crate::error::Result;
use crate::events::{WindowGeometry, WindowScope, WindowSnapshot};
use crate::ror_error;
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::WindowManager;

#[derive(Debug, Default)]
struct DryRunState {
    windows: Vec<WindowSnapshot>,
    active_workspace: i32,
    operations: Vec<String>,
}

/// Эмуляция оконного менеджера в памяти: фокус переносит окно в начало MRU-списка
pub struct DryRunWindowManager {
    state: Mutex<DryRunState>,
}

impl DryRunWindowManager {
    pub fn new() -> Self {
        let geometry = WindowGeometry { x: 0, y: 0, width: 1280, height: 720 };
        let windows = vec![
            WindowSnapshot::new(1, "Terminal - dry_run").with_class("Gnome-terminal").with_focus(true),
            WindowSnapshot::new(2, "Browser - dry_run").with_class("firefox"),
            WindowSnapshot::new(3, "Editor - dry_run").with_class("Code"),
            WindowSnapshot::new(4, "Terminal 2 - dry_run").with_class("Gnome-terminal").on_workspace(1),
        ]
        .into_iter()
        .map(|w| w.with_geometry(geometry))
        .collect();

        Self::with_windows(windows, 0)
    }

    pub fn with_windows(windows: Vec<WindowSnapshot>, active_workspace: i32) -> Self {
        Self {
            state: Mutex::new(DryRunState {
                windows,
                active_workspace,
                operations: Vec::new(),
            }),
        }
    }

    /// Выполненные операции в виде `focus 2`, `minimize 1`, ...
    pub fn operations(&self) -> Vec<String> {
        self.state.lock().operations.clone()
    }

    fn record(state: &mut DryRunState, operation: String) {
        info!("[DRY RUN] {}", operation);
        state.operations.push(operation);
    }
}

impl Default for DryRunWindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager for DryRunWindowManager {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn list_windows(&self, scope: WindowScope) -> Result<Vec<WindowSnapshot>> {
        let state = self.state.lock();
        Ok(state
            .windows
            .iter()
            .filter(|w| scope == WindowScope::AllWorkspaces || w.workspace == state.active_workspace)
            .cloned()
            .collect())
    }

    fn focus(&self, window: &WindowSnapshot) -> Result<()> {
        let mut state = self.state.lock();
        let index = state
            .windows
            .iter()
            .position(|w| w.id == window.id)
            .ok_or_else(|| ror_error!(window, "окно {} не найдено", window))?;

        let mut focused = state.windows.remove(index);
        for other in &mut state.windows {
            other.focused = false;
        }
        focused.focused = true;
        state.active_workspace = focused.workspace;
        state.windows.insert(0, focused);

        Self::record(&mut state, format!("focus {}", window.id.0));
        Ok(())
    }

    fn minimize(&self, window: &WindowSnapshot) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(index) = state.windows.iter().position(|w| w.id == window.id) {
            let mut minimized = state.windows.remove(index);
            minimized.focused = false;
            state.windows.push(minimized);
        }
        Self::record(&mut state, format!("minimize {}", window.id.0));
        Ok(())
    }

    fn move_to_active_workspace(&self, window: &WindowSnapshot) -> Result<()> {
        let mut state = self.state.lock();
        let active = state.active_workspace;
        if let Some(target) = state.windows.iter_mut().find(|w| w.id == window.id) {
            target.workspace = active;
        }
        Self::record(&mut state, format!("move {} to {}", window.id.0, active));
        Ok(())
    }

    fn center_pointer_on(&self, window: &WindowSnapshot) -> Result<()> {
        let mut state = self.state.lock();
        let (x, y) = window.geometry.map(|g| g.center()).unwrap_or_default();
        Self::record(&mut state, format!("pointer {} {}", x, y));
        Ok(())
    }
}
