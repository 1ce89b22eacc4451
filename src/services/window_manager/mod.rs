//! WindowManager: перечисление окон и операции над ними.
//!
//! Модуль ничего не решает - какое окно поднимать, определяет window_selector.

mod dry_run;
mod sway;
mod r#trait;
mod x11;

pub use self::dry_run::DryRunWindowManager;
pub use self::r#trait::{create_window_manager, WindowManager};
