use crate::error::{RorError, Result};
use crate::events::ActionId;
use crate::rules::Rule;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::hotkeys::HotkeyBackend;

pub type Callback = Box<dyn Fn() + Send + Sync>;

/// Правило, привязанное к захваченному сочетанию
pub struct RuleBinding {
    pub rule: Arc<Rule>,
    pub action: ActionId,
    callback: Callback,
}

/// Итог освобождения сочетаний: ошибки не останавливают освобождение остальных
#[derive(Debug, Default)]
pub struct ReleaseReport {
    pub released: usize,
    pub failures: Vec<RorError>,
}

/// Сопоставляет идентификаторы сработавших сочетаний с правилами и их обработчиками
pub struct HotkeyRegistry {
    backend: Box<dyn HotkeyBackend>,
    bindings: BTreeMap<ActionId, RuleBinding>,
}

impl HotkeyRegistry {
    pub fn new(backend: Box<dyn HotkeyBackend>) -> Self {
        Self {
            backend,
            bindings: BTreeMap::new(),
        }
    }

    /// Захватить сочетание правила и запомнить обработчик
    pub fn listen_for(&mut self, rule: Arc<Rule>, callback: Callback) -> Result<ActionId> {
        debug!("Пытаемся захватить {}", rule.accelerator);
        let action = self.backend.grab(&rule.accelerator)?;

        self.bindings.insert(
            action,
            RuleBinding {
                rule,
                action,
                callback,
            },
        );
        Ok(action)
    }

    /// Вызвать обработчик сработавшего сочетания
    pub fn dispatch(&self, action: ActionId) -> bool {
        match self.bindings.get(&action) {
            Some(binding) => {
                info!("Сработало {} ({})", binding.rule.accelerator, action);
                (binding.callback)();
                true
            }
            None => {
                debug!("Нет обработчика для {}", action);
                false
            }
        }
    }

    /// Освободить все сочетания. Привязки удаляются даже при ошибке освобождения.
    pub fn release_all(&mut self) -> ReleaseReport {
        let mut report = ReleaseReport::default();

        for (action, binding) in std::mem::take(&mut self.bindings) {
            match self.backend.ungrab(action) {
                Ok(()) => report.released += 1,
                Err(e) => {
                    warn!("Не удалось освободить {}: {}", binding.rule.accelerator, e);
                    report.failures.push(RorError::HotkeyRelease {
                        action,
                        accelerator: binding.rule.accelerator.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    pub fn bindings(&self) -> impl Iterator<Item = &RuleBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
