use crate::config::Settings;
use crate::error::{RorError, Result};
use crate::events::{WindowScope, WindowSnapshot};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info};

/// Доступ к окнам рабочего стола: перечисление в порядке MRU и управление
pub trait WindowManager: Send + Sync {
    fn name(&self) -> &'static str;

    /// Окна в порядке MRU: первым идёт последнее активное
    fn list_windows(&self, scope: WindowScope) -> Result<Vec<WindowSnapshot>>;

    /// Активировать окно и передать ему фокус
    fn focus(&self, window: &WindowSnapshot) -> Result<()>;

    fn minimize(&self, window: &WindowSnapshot) -> Result<()>;

    fn move_to_active_workspace(&self, window: &WindowSnapshot) -> Result<()>;

    fn center_pointer_on(&self, window: &WindowSnapshot) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Sway,
    X11,
}

/// Factory function to create a window manager backend based on settings and the dry_run flag
pub fn create_window_manager(settings: &Settings, dry_run: bool) -> Result<Arc<dyn WindowManager>> {
    if dry_run {
        return Ok(Arc::new(super::dry_run::DryRunWindowManager::new()));
    }

    let backend = match settings.window.backend.as_str() {
        "sway" => Backend::Sway,
        "x11" => Backend::X11,
        _ => detect_backend()?,
    };
    info!("Оконный бэкенд: {:?}", backend);

    Ok(match backend {
        Backend::Sway => Arc::new(super::sway::SwayWindowManager::new()),
        Backend::X11 => Arc::new(super::x11::X11WindowManager::new()),
    })
}

fn detect_backend() -> Result<Backend> {
    if std::env::var_os("SWAYSOCK").is_some() {
        return Ok(Backend::Sway);
    }

    if std::env::var_os("DISPLAY").is_some() {
        return Ok(Backend::X11);
    }

    Err(RorError::ServiceUnavailable(
        "не найден ни Sway (SWAYSOCK), ни X11 (DISPLAY)".to_string(),
    ))
}

/// Запустить утилиту и вернуть её stdout
pub(super) fn run_tool(program: &str, args: &[&str]) -> Result<String> {
    debug!("{} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| RorError::Window(format!("{} не найден: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RorError::Window(format!(
            "{} {} вернул ошибку: {}",
            program,
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
