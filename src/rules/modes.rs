use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::Defaults;

/// Режимы поведения правила
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// И запускает команду, и поднимает окно
    AlwaysRun,
    /// Только запускает команду, окна не перебираются
    RunOnly,
    /// Перебирать окна только на активном рабочем столе
    IsolateWorkspace,
    MinimizeWhenUnfocused,
    SwitchBackWhenFocused,
    MoveWindowToActiveWorkspace,
    CenterMouseToFocusedWindow,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::AlwaysRun,
        Mode::RunOnly,
        Mode::IsolateWorkspace,
        Mode::MinimizeWhenUnfocused,
        Mode::SwitchBackWhenFocused,
        Mode::MoveWindowToActiveWorkspace,
        Mode::CenterMouseToFocusedWindow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::AlwaysRun => "always-run",
            Mode::RunOnly => "run-only",
            Mode::IsolateWorkspace => "isolate-workspace",
            Mode::MinimizeWhenUnfocused => "minimize-when-unfocused",
            Mode::SwitchBackWhenFocused => "switch-back-when-focused",
            Mode::MoveWindowToActiveWorkspace => "move-window-to-active-workspace",
            Mode::CenterMouseToFocusedWindow => "center-mouse-to-focused-window",
        }
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL.into_iter().find(|mode| mode.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeValue {
    Enabled,
    Arg(String),
}

/// Набор режимов, разобранный из `accelerator:mode:mode(arg)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSet {
    modes: BTreeMap<Mode, ModeValue>,
}

impl ModeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Разобрать первое поле строки правила на сочетание клавиш и режимы.
    /// Неизвестные режимы молча отбрасываются.
    pub fn parse_token(token: &str) -> (String, ModeSet) {
        let mut segments = token.split(':');
        let accelerator = segments.next().unwrap_or_default().trim().to_string();

        let mut set = ModeSet::new();
        for segment in segments {
            let (name, value) = split_mode_segment(segment.trim());
            match name.parse::<Mode>() {
                Ok(mode) => {
                    set.modes.insert(mode, value);
                }
                Err(()) => {
                    tracing::debug!("Неизвестный режим '{}' пропущен", name);
                }
            }
        }

        (accelerator, set)
    }

    pub fn insert(&mut self, mode: Mode, value: ModeValue) {
        self.modes.insert(mode, value);
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.modes.contains_key(&mode)
    }

    pub fn get(&self, mode: Mode) -> Option<&ModeValue> {
        self.modes.get(&mode)
    }

    /// Режим действует, если задан в правиле или включён глобально
    pub fn is_active(&self, mode: Mode, defaults: &Defaults) -> bool {
        self.contains(mode) || defaults.get(mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Mode, &ModeValue)> {
        self.modes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(mode, value)| match value {
                ModeValue::Enabled => mode.to_string(),
                ModeValue::Arg(arg) => format!("{}({})", mode, arg),
            })
            .collect();
        write!(f, "{}", parts.join(":"))
    }
}

/// `name(arg)` -> (name, Arg(arg)); `name` -> (name, Enabled)
fn split_mode_segment(segment: &str) -> (&str, ModeValue) {
    if let Some(open) = segment.find('(') {
        if let Some(inner) = segment[open + 1..].strip_suffix(')') {
            return (segment[..open].trim(), ModeValue::Arg(inner.to_string()));
        }
    }
    (segment, ModeValue::Enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
        assert!("launch".parse::<Mode>().is_err());
        assert!("Always-Run".parse::<Mode>().is_err());
    }

    #[test]
    fn test_parse_token_splits_accelerator_and_modes() {
        let (accel, modes) = ModeSet::parse_token(" <Super>e :always-run:isolate-workspace");
        assert_eq!(accel, "<Super>e");
        assert!(modes.contains(Mode::AlwaysRun));
        assert!(modes.contains(Mode::IsolateWorkspace));
        assert!(!modes.contains(Mode::RunOnly));
        assert_eq!(modes.get(Mode::AlwaysRun), Some(&ModeValue::Enabled));
    }

    #[test]
    fn test_parse_token_with_argument() {
        let (_, modes) = ModeSet::parse_token("<Super>e:center-mouse-to-focused-window(2)");
        assert_eq!(
            modes.get(Mode::CenterMouseToFocusedWindow),
            Some(&ModeValue::Arg("2".to_string()))
        );
        assert_eq!(modes.to_string(), "center-mouse-to-focused-window(2)");
    }

    #[test]
    fn test_unknown_modes_are_dropped() {
        let (accel, modes) = ModeSet::parse_token("<Super>e:launch(2):bogus:run-only");
        assert_eq!(accel, "<Super>e");
        assert_eq!(modes.iter().count(), 1);
        assert!(modes.contains(Mode::RunOnly));
    }

    #[test]
    fn test_rule_flag_wins_over_default() {
        let (_, modes) = ModeSet::parse_token("<Super>e:switch-back-when-focused");
        let defaults = Defaults::default();
        assert!(modes.is_active(Mode::SwitchBackWhenFocused, &defaults));
        assert!(!modes.is_active(Mode::MinimizeWhenUnfocused, &defaults));

        let defaults = Defaults {
            minimize_when_unfocused: true,
            ..Defaults::default()
        };
        assert!(modes.is_active(Mode::MinimizeWhenUnfocused, &defaults));
    }
}
