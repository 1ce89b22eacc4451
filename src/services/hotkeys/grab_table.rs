use crate::error::{RorError, Result};
use crate::events::{Accelerator, ActionId, Modifiers};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::r#trait::HotkeyBackend;

#[derive(Debug, Default)]
struct GrabState {
    next_id: u32,
    grabs: BTreeMap<ActionId, Accelerator>,
}

/// Таблица захваченных сочетаний, общая для HotkeyBackend и слушателя ввода
#[derive(Debug, Clone, Default)]
pub struct GrabTable {
    state: Arc<RwLock<GrabState>>,
}

impl GrabTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Найти сочетание по нажатой клавише и точному набору модификаторов
    pub fn lookup(&self, key_code: u16, modifiers: &Modifiers) -> Option<ActionId> {
        self.state
            .read()
            .grabs
            .iter()
            .find(|(_, accel)| accel.matches(key_code, modifiers))
            .map(|(id, _)| *id)
    }

    pub fn lookup_accelerator(&self, accelerator: &Accelerator) -> Option<ActionId> {
        self.lookup(accelerator.key_code, &accelerator.modifiers)
    }

    pub fn len(&self) -> usize {
        self.state.read().grabs.len()
    }
}

impl HotkeyBackend for GrabTable {
    fn grab(&mut self, accelerator: &str) -> Result<ActionId> {
        let parsed = Accelerator::parse(accelerator)
            .or_else(|reason| RorError::grab(accelerator, reason))?;

        let mut state = self.state.write();
        if let Some((id, _)) = state.grabs.iter().find(|(_, a)| **a == parsed) {
            return RorError::grab(accelerator, format!("уже захвачено как {}", id));
        }

        state.next_id += 1;
        let id = ActionId(state.next_id);
        debug!("Сочетание {} захвачено как {}", parsed, id);
        state.grabs.insert(id, parsed);
        Ok(id)
    }

    fn ungrab(&mut self, action: ActionId) -> Result<()> {
        match self.state.write().grabs.remove(&action) {
            Some(accel) => {
                debug!("Сочетание {} ({}) освобождено", accel, action);
                Ok(())
            }
            None => Err(RorError::HotkeyRelease {
                action,
                accelerator: String::new(),
                reason: "сочетание не захвачено".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_and_lookup() {
        let mut table = GrabTable::new();
        let id = table.grab("<Super>e").unwrap();

        let accel = Accelerator::parse("super+e").unwrap();
        assert_eq!(table.lookup(accel.key_code, &accel.modifiers), Some(id));
        assert_eq!(table.lookup(accel.key_code, &Modifiers::new()), None);
    }

    #[test]
    fn test_duplicate_grab_fails() {
        let mut table = GrabTable::new();
        table.grab("<Super>e").unwrap();
        let err = table.grab("super+E").unwrap_err();
        assert!(matches!(err, RorError::HotkeyGrab { .. }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_invalid_accelerator_fails() {
        let mut table = GrabTable::new();
        assert!(matches!(
            table.grab("<Hyper>q").unwrap_err(),
            RorError::HotkeyGrab { .. }
        ));
    }

    #[test]
    fn test_ungrab() {
        let mut table = GrabTable::new();
        let id = table.grab("<Ctrl><Alt>t").unwrap();
        assert!(table.ungrab(id).is_ok());
        assert_eq!(table.len(), 0);
        assert!(table.ungrab(id).is_err());

        // Освобождённое сочетание можно захватить снова, с новым идентификатором
        let again = table.grab("<Ctrl><Alt>t").unwrap();
        assert_ne!(again, id);
    }

    #[test]
    fn test_clones_share_state() {
        let mut table = GrabTable::new();
        let listener_view = table.clone();
        let id = table.grab("<Super>1").unwrap();
        let accel = Accelerator::parse("<Super>1").unwrap();
        assert_eq!(listener_view.lookup_accelerator(&accel), Some(id));
    }
}
