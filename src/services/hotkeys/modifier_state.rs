use crate::events::Modifiers;
use evdev::KeyCode;

#[derive(Debug, Default)]
pub struct ModifierState {
    ctrl: [bool; 2],
    alt: [bool; 2],
    shift: [bool; 2],
    super_key: [bool; 2],
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl.iter().any(|k| *k),
            alt: self.alt.iter().any(|k| *k),
            shift: self.shift.iter().any(|k| *k),
            super_key: self.super_key.iter().any(|k| *k),
        }
    }

    /// Левая и правая клавиши учитываются отдельно: отпускание одной не сбрасывает другую
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let slot = match key {
            KeyCode::KEY_LEFTCTRL => &mut self.ctrl[0],
            KeyCode::KEY_RIGHTCTRL => &mut self.ctrl[1],
            KeyCode::KEY_LEFTALT => &mut self.alt[0],
            KeyCode::KEY_RIGHTALT => &mut self.alt[1],
            KeyCode::KEY_LEFTSHIFT => &mut self.shift[0],
            KeyCode::KEY_RIGHTSHIFT => &mut self.shift[1],
            KeyCode::KEY_LEFTMETA => &mut self.super_key[0],
            KeyCode::KEY_RIGHTMETA => &mut self.super_key[1],
            _ => return false,
        };
        *slot = pressed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_tracking() {
        let mut state = ModifierState::new();
        assert!(state.to_modifiers().is_empty());

        assert!(state.update_key(KeyCode::KEY_LEFTMETA, true));
        assert!(state.update_key(KeyCode::KEY_RIGHTSHIFT, true));
        let mods = state.to_modifiers();
        assert!(mods.super_key && mods.shift);
        assert!(!mods.ctrl && !mods.alt);

        assert!(!state.update_key(KeyCode::KEY_E, true));
    }

    #[test]
    fn test_left_and_right_are_independent() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_LEFTCTRL, true);
        state.update_key(KeyCode::KEY_RIGHTCTRL, true);
        state.update_key(KeyCode::KEY_LEFTCTRL, false);
        assert!(state.to_modifiers().ctrl);

        state.update_key(KeyCode::KEY_RIGHTCTRL, false);
        assert!(!state.to_modifiers().ctrl);
    }
}
