//! Горячие клавиши: таблица захватов и слушатели ввода.
//!
//! Слушатель только сообщает идентификатор сработавшего сочетания в канал;
//! что делать по срабатыванию, решает Controller.

mod dry_listener;
mod evdev_listener;
mod grab_table;
mod modifier_state;
mod r#trait;

pub use self::grab_table::GrabTable;
pub use self::r#trait::{create_hotkey_subsystem, HotkeyBackend, HotkeyListenerTrait};
