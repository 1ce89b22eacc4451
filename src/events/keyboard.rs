use crate::mappings::key_names;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl KeyState {
    /// Значение поля value у evdev события EV_KEY
    pub fn from_evdev_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeat),
            _ => None,
        }
    }
}

/// Идентификатор, выданный подсистемой горячих клавиш при захвате сочетания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    pub fn to_vec(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.ctrl { result.push("ctrl"); }
        if self.alt { result.push("alt"); }
        if self.shift { result.push("shift"); }
        if self.super_key { result.push("super"); }
        result
    }

    /// Включить модификатор по имени. GTK-синонимы (`Primary`, `Control`, `Meta`) тоже понимаются.
    fn set_by_name(&mut self, name: &str) -> bool {
        match name.trim().to_lowercase().as_str() {
            "ctrl" | "control" | "primary" => self.ctrl = true,
            "alt" | "mod1" => self.alt = true,
            "shift" => self.shift = true,
            "super" | "meta" | "mod4" | "win" => self.super_key = true,
            _ => return false,
        }
        true
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Сочетание клавиш в формате GTK: `<Super>e`, `<Ctrl><Alt>t`, `<Primary><Shift>Return`.
/// Также принимается запись через плюс: `super+e`.
#[derive(Debug, Clone, Eq)]
pub struct Accelerator {
    pub modifiers: Modifiers,
    pub key_code: u16,
    pub text: String,
}

impl PartialEq for Accelerator {
    fn eq(&self, other: &Self) -> bool {
        self.modifiers == other.modifiers && self.key_code == other.key_code
    }
}

impl Accelerator {
    pub fn parse(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        let mut modifiers = Modifiers::new();
        let mut rest = trimmed;

        while let Some(stripped) = rest.strip_prefix('<') {
            let end = stripped
                .find('>')
                .ok_or_else(|| format!("незакрытый модификатор в '{}'", trimmed))?;
            let name = &stripped[..end];
            if !modifiers.set_by_name(name) {
                return Err(format!("неизвестный модификатор '{}'", name));
            }
            rest = &stripped[end + 1..];
        }

        // Запись через плюс: все сегменты кроме последнего - модификаторы
        let key_name = match rest.rsplit_once('+') {
            Some((mods, key)) if !key.is_empty() => {
                for name in mods.split('+') {
                    if !modifiers.set_by_name(name) {
                        return Err(format!("неизвестный модификатор '{}'", name));
                    }
                }
                key
            }
            _ => rest,
        };

        if key_name.trim().is_empty() {
            return Err(format!("в сочетании '{}' не указана клавиша", trimmed));
        }

        let key_code = key_names::translate(key_name)?;

        Ok(Self {
            modifiers,
            key_code,
            text: trimmed.to_string(),
        })
    }

    pub fn matches(&self, key_code: u16, modifiers: &Modifiers) -> bool {
        self.key_code == key_code && self.modifiers == *modifiers
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
