//! WindowSelector: решает, что сделать по горячей клавише - поднять окно или запустить команду.
//!
//! Модуль не трогает ни окна, ни процессы: он только возвращает список действий,
//! которые затем выполняет Controller через оконный бэкенд и Spawner.

use crate::config::Defaults;
use crate::debug_if_enabled;
use crate::events::WindowSnapshot;
use crate::rules::{Mode, Rule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Поднять окно (перенос на активный стол и центрирование курсора - по режимам)
    Focus(WindowSnapshot),
    Minimize(WindowSnapshot),
    Spawn,
}

/// Соответствует ли окно условиям правила
pub fn conforms(rule: &Rule, window: &WindowSnapshot) -> bool {
    if rule.class_matcher.is_present() {
        return rule.class_matcher.matches(&window.class)
            && (!rule.title_matcher.is_present() || rule.title_matcher.matches(&window.title));
    }

    if rule.title_matcher.is_present() {
        return rule.title_matcher.matches(&window.title);
    }

    // Пустая команда совпала бы с любым окном
    if rule.command.is_empty() {
        return false;
    }

    let command = rule.command.to_lowercase();
    window.class.to_lowercase().contains(&command) || window.title.to_lowercase().contains(&command)
}

/// Принять решение по правилу.
///
/// `windows` - окна в порядке MRU (первое - последнее активное), уже отфильтрованные
/// по активному рабочему столу, если действует `isolate-workspace`.
/// `all_windows` - полный MRU-список, из него выбирается окно для `switch-back-when-focused`.
pub fn decide(
    rule: &Rule,
    defaults: &Defaults,
    windows: &[WindowSnapshot],
    all_windows: &[WindowSnapshot],
) -> Vec<Action> {
    if rule.has(Mode::RunOnly) {
        return vec![Action::Spawn];
    }

    let seen = select(rule, windows);
    let always_run = rule.has(Mode::AlwaysRun);
    let mut actions = Vec::new();

    match seen {
        None => {
            debug_if_enabled!("{}: подходящих окон нет", rule.accelerator);
            return vec![Action::Spawn];
        }
        Some(window) if !window.focused => {
            debug_if_enabled!("{}: окно без фокуса, поднимаем {}", rule.accelerator, window);
            actions.push(Action::Focus(window.clone()));
        }
        Some(window) => {
            debug_if_enabled!("{}: подходящее окно уже в фокусе: {}", rule.accelerator, window);

            if rule.modes.is_active(Mode::MinimizeWhenUnfocused, defaults) {
                actions.push(Action::Minimize(window.clone()));
            }

            if rule.modes.is_active(Mode::SwitchBackWhenFocused, defaults) {
                let previous = all_windows
                    .iter()
                    .find(|w| w.monitor == window.monitor && w.id != window.id);
                if let Some(previous) = previous {
                    debug_if_enabled!("{}: возвращаемся к {}", rule.accelerator, previous);
                    actions.push(Action::Focus(previous.clone()));
                }
            }
        }
    }

    if always_run {
        actions.push(Action::Spawn);
    }

    actions
}

/// Найти окно для подъёма. Если активное окно уже подходит, идём от самого старого
/// окна группы, иначе - от самого свежего. Первое подходящее окно без фокуса побеждает.
fn select<'a>(rule: &Rule, windows: &'a [WindowSnapshot]) -> Option<&'a WindowSnapshot> {
    let head = windows.first()?;

    let order: Box<dyn Iterator<Item = &'a WindowSnapshot>> = if conforms(rule, head) {
        Box::new(windows.iter().rev())
    } else {
        Box::new(windows.iter())
    };

    let mut seen = None;
    for window in order {
        if conforms(rule, window) {
            seen = Some(window);
            if !window.focused {
                break;
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse;

    fn rule(line: &str) -> Rule {
        let report = parse(line);
        assert!(report.is_clean(), "строка не разобрана: {}", line);
        report.rules.into_iter().next().unwrap()
    }

    fn window(id: u64, class: &str, title: &str) -> WindowSnapshot {
        WindowSnapshot::new(id, title).with_class(class)
    }

    #[test]
    fn test_conforms_by_class_and_title() {
        let r = rule("<Super>f, firefox, Firefox, Mozilla");
        assert!(conforms(&r, &window(1, "Firefox", "Page - Mozilla Firefox")));
        assert!(!conforms(&r, &window(2, "Firefox", "Private Browsing")));
        assert!(!conforms(&r, &window(3, "Chromium", "Mozilla docs")));
    }

    #[test]
    fn test_conforms_by_title_only() {
        let r = rule("<Super>n, nvim, , /^NVIM/");
        assert!(conforms(&r, &window(1, "kitty", "NVIM main.rs")));
        assert!(!conforms(&r, &window(2, "kitty", "zsh")));
    }

    #[test]
    fn test_conforms_by_command_fallback_is_case_insensitive() {
        let r = rule("<Super>g, Gimp, , ");
        assert!(conforms(&r, &window(1, "gimp-2.10", "Untitled")));
        assert!(conforms(&r, &window(2, "Xorg", "GIMP image")));
        assert!(!conforms(&r, &window(3, "kitty", "zsh")));
    }

    #[test]
    fn test_empty_command_never_conforms_by_fallback() {
        let r = rule("<Super>g, , , ");
        assert!(!conforms(&r, &window(1, "anything", "at all")));
    }

    #[test]
    fn test_cycles_from_oldest_when_head_conforms() {
        let r = rule("<Super>x, classx-app, classX");
        let a = window(1, "classX", "A").with_focus(true);
        let b = window(2, "classX", "B");
        let windows = vec![a.clone(), b.clone()];

        assert_eq!(decide(&r, &Defaults::default(), &windows, &windows), vec![Action::Focus(b)]);
    }

    #[test]
    fn test_jumps_to_most_recent_match_when_head_does_not_conform() {
        let r = rule("<Super>x, app, classX");
        let other = window(1, "classY", "focused").with_focus(true);
        let recent = window(2, "classX", "recent");
        let old = window(3, "classX", "old");
        let windows = vec![other, recent.clone(), old];

        assert_eq!(
            decide(&r, &Defaults::default(), &windows, &windows),
            vec![Action::Focus(recent)]
        );
    }

    #[test]
    fn test_no_conforming_window_spawns() {
        let r = rule("<Super>x, app, classX");
        let windows = vec![window(1, "classY", "A").with_focus(true)];
        assert_eq!(decide(&r, &Defaults::default(), &windows, &windows), vec![Action::Spawn]);
        assert_eq!(decide(&r, &Defaults::default(), &[], &[]), vec![Action::Spawn]);
    }

    #[test]
    fn test_run_only_skips_scanning() {
        let r = rule("<Super>x, classX");
        let windows = vec![window(1, "classX", "A")];
        assert_eq!(decide(&r, &Defaults::default(), &windows, &windows), vec![Action::Spawn]);
    }

    #[test]
    fn test_focused_single_match_does_nothing_by_default() {
        let r = rule("<Super>x, app, classX");
        let windows = vec![window(1, "classX", "A").with_focus(true)];
        assert!(decide(&r, &Defaults::default(), &windows, &windows).is_empty());
    }

    #[test]
    fn test_switch_back_when_focused() {
        let r = rule("<Super>x:switch-back-when-focused, app, classX");
        let a = window(1, "classX", "A").with_focus(true).on_monitor(0);
        let elsewhere = window(2, "classZ", "other monitor").on_monitor(1);
        let c = window(3, "classY", "C").on_monitor(0);
        let windows = vec![a];
        let all = vec![windows[0].clone(), elsewhere, c.clone()];

        assert_eq!(decide(&r, &Defaults::default(), &windows, &all), vec![Action::Focus(c)]);
    }

    #[test]
    fn test_minimize_when_unfocused_from_defaults() {
        let r = rule("<Super>x, app, classX");
        let a = window(1, "classX", "A").with_focus(true);
        let windows = vec![a.clone()];
        let defaults = Defaults {
            minimize_when_unfocused: true,
            ..Defaults::default()
        };

        assert_eq!(decide(&r, &defaults, &windows, &windows), vec![Action::Minimize(a)]);
    }

    #[test]
    fn test_always_run_adds_spawn() {
        let r = rule("<Super>x:always-run, app, classX");
        let defaults = Defaults::default();

        let focused = vec![window(1, "classX", "A").with_focus(true)];
        assert_eq!(decide(&r, &defaults, &focused, &focused), vec![Action::Spawn]);

        let b = window(2, "classX", "B");
        let unfocused = vec![window(1, "classY", "A").with_focus(true), b.clone()];
        assert_eq!(
            decide(&r, &defaults, &unfocused, &unfocused),
            vec![Action::Focus(b), Action::Spawn]
        );

        assert_eq!(decide(&r, &defaults, &[], &[]), vec![Action::Spawn]);
    }

    #[test]
    fn test_cycling_advances_through_group() {
        // A (в фокусе), B, C одного класса: следующим поднимается самое старое - C
        let r = rule("<Super>x, app, classX");
        let a = window(1, "classX", "A").with_focus(true);
        let b = window(2, "classX", "B");
        let c = window(3, "classX", "C");
        let windows = vec![a, b, c.clone()];

        assert_eq!(decide(&r, &Defaults::default(), &windows, &windows), vec![Action::Focus(c)]);
    }
}
