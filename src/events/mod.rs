pub mod keyboard;
pub mod window;

pub use keyboard::{Accelerator, ActionId, KeyState, Modifiers};
pub use window::{WindowGeometry, WindowScope, WindowSnapshot};
