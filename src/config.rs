use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rules::Mode;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Файл правил, `~` раскрывается
    pub shortcuts: String,
    /// Откуда копировать правила при первом запуске. Если не задано - встроенный шаблон.
    pub default_shortcuts: Option<String>,
}

/// Глобальные значения режимов, действующие когда правило не задаёт флаг само
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub isolate_workspace: bool,
    pub minimize_when_unfocused: bool,
    pub switch_back_when_focused: bool,
    pub move_window_to_active_workspace: bool,
    pub center_mouse_to_focused_window: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub device_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub backend: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            shortcuts: "~/.config/run-or-raise/shortcuts.conf".to_string(),
            default_shortcuts: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            backend: "auto".to_string(),
        }
    }
}

impl Defaults {
    /// Глобальное значение режима. `always-run` и `run-only` глобально не настраиваются.
    pub fn get(&self, mode: Mode) -> bool {
        match mode {
            Mode::IsolateWorkspace => self.isolate_workspace,
            Mode::MinimizeWhenUnfocused => self.minimize_when_unfocused,
            Mode::SwitchBackWhenFocused => self.switch_back_when_focused,
            Mode::MoveWindowToActiveWorkspace => self.move_window_to_active_workspace,
            Mode::CenterMouseToFocusedWindow => self.center_mouse_to_focused_window,
            Mode::AlwaysRun | Mode::RunOnly => false,
        }
    }
}

impl Settings {
    /// Прочитать TOML и переменные окружения. Проверка - отдельно через `validate`,
    /// после того как применены параметры командной строки.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("RUN_OR_RAISE_").split("__"));

        let settings: Settings = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить настройки из {:?}", config_path))?;

        Ok(settings)
    }

    /// Параметры командной строки перекрывают файл и окружение
    pub fn apply_overrides(&mut self, shortcuts: Option<&str>, log_level: Option<&str>) {
        if let Some(shortcuts) = shortcuts {
            self.paths.shortcuts = shortcuts.to_string();
        }
        if let Some(level) = log_level {
            self.logging.level = level.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        match self.window.backend.as_str() {
            "auto" | "sway" | "x11" => {}
            _ => anyhow::bail!("Неверный оконный бэкенд: {}", self.window.backend),
        }

        if self.paths.shortcuts.trim().is_empty() {
            anyhow::bail!("paths.shortcuts не может быть пустым");
        }

        if self.input.device_path.trim().is_empty() {
            anyhow::bail!("input.device_path не может быть пустым (используйте \"auto\")");
        }

        Ok(())
    }

    /// Путь к файлу правил с раскрытым `~` и переменными окружения
    pub fn shortcuts_path(&self) -> PathBuf {
        expand(&self.paths.shortcuts)
    }

    pub fn default_shortcuts_path(&self) -> Option<PathBuf> {
        self.paths.default_shortcuts.as_deref().map(expand)
    }
}

fn expand(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}
