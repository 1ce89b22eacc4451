pub mod controller;
pub mod hotkey_registry;
pub mod hotkeys;
pub mod spawner;
pub mod window_manager;
pub mod window_selector;

pub use controller::Controller;
pub use hotkeys::create_hotkey_subsystem;
pub use spawner::create_spawner;
pub use window_manager::create_window_manager;
