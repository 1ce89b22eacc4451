use crate::config::Settings;
use crate::debug_if_enabled;
use crate::error::{RorError, Result};
use crate::events::{ActionId, KeyState};
use crate::utils::DeviceFinder;
use evdev::{Device, EventType, InputEvent, KeyCode};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

use super::grab_table::GrabTable;
use super::modifier_state::ModifierState;
use super::HotkeyListenerTrait;

/// Слушает клавиатуру через evdev и сообщает о нажатиях захваченных сочетаний.
/// Устройство не захватывается эксклюзивно: нажатия доходят и до сессии.
pub struct EvdevHotkeyListener {
    device: Device,
    device_name: String,
    grabs: GrabTable,
    sender: UnboundedSender<ActionId>,
    modifier_state: ModifierState,
}

impl EvdevHotkeyListener {
    pub fn new(
        settings: Arc<Settings>,
        grabs: GrabTable,
        sender: UnboundedSender<ActionId>,
    ) -> Result<Self> {
        info!("Инициализация EvdevHotkeyListener");

        let device_path = DeviceFinder::find_keyboard_device(&settings.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            RorError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        let device_name = device.name().unwrap_or("Unknown").to_string();
        info!("Клавиатура: {} ({:?})", device_name, device_path);

        Ok(Self {
            device,
            device_name,
            grabs,
            sender,
            modifier_state: ModifierState::new(),
        })
    }

    async fn run_impl(mut self) -> Result<()> {
        info!("EvdevHotkeyListener запущен, читаем события {}", self.device_name);

        let mut stream = self.device.into_event_stream()?;

        loop {
            let event = match stream.next_event().await {
                Ok(event) => event,
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            if let Some(action) = handle_event(&mut self.modifier_state, &self.grabs, event) {
                if self.sender.send(action).is_err() {
                    warn!("Получатель срабатываний закрыт, слушатель останавливается");
                    return Ok(());
                }
            }
        }
    }
}

/// Обновить состояние модификаторов и вернуть сработавшее сочетание, если есть
fn handle_event(
    modifier_state: &mut ModifierState,
    grabs: &GrabTable,
    event: InputEvent,
) -> Option<ActionId> {
    if event.event_type() != EventType::KEY {
        return None;
    }

    let state = KeyState::from_evdev_value(event.value())?;
    let key = KeyCode::new(event.code());

    if modifier_state.update_key(key, state != KeyState::Released) {
        return None;
    }

    // Автоповтор не должен перебирать окна
    if state != KeyState::Pressed {
        return None;
    }

    let modifiers = modifier_state.to_modifiers();
    let action = grabs.lookup(event.code(), &modifiers);
    debug_if_enabled!("Клавиша {} ({}) -> {:?}", event.code(), modifiers, action);
    action
}

#[async_trait::async_trait]
impl HotkeyListenerTrait for EvdevHotkeyListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
