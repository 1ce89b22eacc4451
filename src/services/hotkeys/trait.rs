use crate::config::Settings;
use crate::error::Result;
use crate::events::ActionId;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use super::GrabTable;

/// Захват и освобождение глобальных сочетаний клавиш
pub trait HotkeyBackend: Send {
    /// Захватить сочетание. Возвращает идентификатор, с которым придут срабатывания.
    fn grab(&mut self, accelerator: &str) -> Result<ActionId>;

    /// Освободить сочетание и отозвать разрешение на его срабатывание
    fn ungrab(&mut self, action: ActionId) -> Result<()>;
}

/// Trait for hotkey listeners that can run in different modes
#[async_trait::async_trait]
pub trait HotkeyListenerTrait {
    /// Run the listener until input ends or the activation receiver is dropped
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Всё, что нужно main для работы с горячими клавишами
pub struct HotkeySubsystem {
    pub backend: Box<dyn HotkeyBackend>,
    pub listener: Box<dyn HotkeyListenerTrait + Send>,
    pub activations: UnboundedReceiver<ActionId>,
}

/// Factory function to create the hotkey subsystem based on the dry_run flag
pub fn create_hotkey_subsystem(settings: Arc<Settings>, dry_run: bool) -> Result<HotkeySubsystem> {
    let grabs = GrabTable::new();
    let (sender, activations) = unbounded_channel();

    let listener: Box<dyn HotkeyListenerTrait + Send> = if dry_run {
        Box::new(super::dry_listener::DryRunHotkeyListener::new(grabs.clone(), sender))
    } else {
        Box::new(super::evdev_listener::EvdevHotkeyListener::new(
            settings,
            grabs.clone(),
            sender,
        )?)
    };

    Ok(HotkeySubsystem {
        backend: Box::new(grabs),
        listener,
        activations,
    })
}
