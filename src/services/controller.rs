//! Controller: связывает правила из файла с горячими клавишами и выполняет решения
//! WindowSelector через оконный бэкенд и Spawner.
//!
//! Жизненный цикл явный: `enable()` читает файл и захватывает сочетания,
//! `disable()` всё освобождает. Ошибки отдельных строк и сочетаний собираются
//! в отчёты и не мешают остальным.

use crate::config::{Defaults, Settings};
use crate::error::RorError;
use crate::events::{ActionId, WindowScope, WindowSnapshot};
use crate::rules::{self, LineError, Mode, Rule};
use crate::utils::shortcuts_file;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::hotkey_registry::{HotkeyRegistry, ReleaseReport};
use super::hotkeys::HotkeyBackend;
use super::spawner::Spawner;
use super::window_manager::WindowManager;
use super::window_selector::{self, Action};

/// Внешние исполнители решений
pub struct Host {
    pub windows: Arc<dyn WindowManager>,
    pub spawner: Arc<dyn Spawner>,
    pub defaults: Defaults,
}

/// Итог включения: какие сочетания захвачены и что пошло не так
#[derive(Debug, Default)]
pub struct EnableReport {
    pub bound: Vec<(ActionId, String)>,
    pub parse_errors: Vec<LineError>,
    pub grab_errors: Vec<RorError>,
    pub load_error: Option<RorError>,
}

pub struct Controller {
    settings: Arc<Settings>,
    registry: HotkeyRegistry,
    host: Arc<Host>,
}

impl Controller {
    pub fn new(
        settings: Arc<Settings>,
        hotkeys: Box<dyn HotkeyBackend>,
        windows: Arc<dyn WindowManager>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        let host = Arc::new(Host {
            windows,
            spawner,
            defaults: settings.defaults,
        });

        Self {
            settings,
            registry: HotkeyRegistry::new(hotkeys),
            host,
        }
    }

    /// Прочитать файл правил и захватить сочетания
    pub fn enable(&mut self) -> EnableReport {
        let path = self.settings.shortcuts_path();
        let default_path = self.settings.default_shortcuts_path();

        match shortcuts_file::load_shortcuts(&path, default_path.as_deref()) {
            Ok(text) => {
                info!("Правила загружены из {:?}", path);
                self.enable_from_text(&text)
            }
            Err(e) => {
                error!("Правила не загружены: {}", e);
                EnableReport {
                    load_error: Some(e),
                    ..EnableReport::default()
                }
            }
        }
    }

    pub fn enable_from_text(&mut self, text: &str) -> EnableReport {
        if !self.registry.is_empty() {
            warn!("Controller уже включён, освобождаем прежние сочетания");
            self.disable();
        }

        let parsed = rules::parse(text);
        let mut report = EnableReport {
            parse_errors: parsed.errors,
            ..EnableReport::default()
        };

        for rule in parsed.rules {
            let rule = Arc::new(rule);
            let callback = {
                let host = Arc::clone(&self.host);
                let rule = Arc::clone(&rule);
                Box::new(move || run_rule(&host, &rule))
            };

            match self.registry.listen_for(Arc::clone(&rule), callback) {
                Ok(action) => {
                    debug!("Правило {} активно ({})", rule, action);
                    report.bound.push((action, rule.accelerator.clone()));
                }
                Err(e) => {
                    warn!("Строка {}: {}", rule.line, e);
                    report.grab_errors.push(e);
                }
            }
        }

        info!(
            "Активно правил: {}, ошибок разбора: {}, не захвачено: {}",
            report.bound.len(),
            report.parse_errors.len(),
            report.grab_errors.len()
        );
        report
    }

    /// Освободить все сочетания
    pub fn disable(&mut self) -> ReleaseReport {
        let report = self.registry.release_all();
        info!(
            "Освобождено сочетаний: {}, ошибок: {}",
            report.released,
            report.failures.len()
        );
        report
    }

    /// Обработать срабатывание сочетания
    pub fn activate(&self, action: ActionId) -> bool {
        self.registry.dispatch(action)
    }

    pub fn registry(&self) -> &HotkeyRegistry {
        &self.registry
    }
}

/// Выполнить правило: собрать окна, принять решение и исполнить его
fn run_rule(host: &Host, rule: &Rule) {
    if rule.has(Mode::RunOnly) {
        spawn(host, rule);
        return;
    }

    let defaults = &host.defaults;
    let isolate = rule.modes.is_active(Mode::IsolateWorkspace, defaults);
    let scope = if isolate {
        WindowScope::ActiveWorkspace
    } else {
        WindowScope::AllWorkspaces
    };

    let windows = list_windows(host, scope);
    let all_windows;
    let all: &[WindowSnapshot] =
        if isolate && rule.modes.is_active(Mode::SwitchBackWhenFocused, defaults) {
            all_windows = list_windows(host, WindowScope::AllWorkspaces);
            &all_windows
        } else {
            &windows
        };

    for action in window_selector::decide(rule, defaults, &windows, all) {
        match action {
            Action::Focus(window) => focus_window(host, rule, &window),
            Action::Minimize(window) => {
                if let Err(e) = host.windows.minimize(&window) {
                    warn!("Не удалось свернуть {}: {}", window, e);
                }
            }
            Action::Spawn => spawn(host, rule),
        }
    }
}

fn list_windows(host: &Host, scope: WindowScope) -> Vec<WindowSnapshot> {
    host.windows.list_windows(scope).unwrap_or_else(|e| {
        warn!("Не удалось получить список окон ({}): {}", host.windows.name(), e);
        Vec::new()
    })
}

fn focus_window(host: &Host, rule: &Rule, window: &WindowSnapshot) {
    let defaults = &host.defaults;

    if rule.modes.is_active(Mode::MoveWindowToActiveWorkspace, defaults) {
        if let Err(e) = host.windows.move_to_active_workspace(window) {
            warn!("Не удалось перенести {} на активный стол: {}", window, e);
        }
    }

    if let Err(e) = host.windows.focus(window) {
        warn!("Не удалось активировать {}: {}", window, e);
        return;
    }

    if rule.modes.is_active(Mode::CenterMouseToFocusedWindow, defaults) {
        if let Err(e) = host.windows.center_pointer_on(window) {
            warn!("Не удалось переместить курсор на {}: {}", window, e);
        }
    }
}

fn spawn(host: &Host, rule: &Rule) {
    if let Err(e) = host.spawner.spawn(&rule.command) {
        error!("Не удалось запустить '{}': {}", rule.command, e);
    }
}
