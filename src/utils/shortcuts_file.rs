//! Чтение файла правил с начальным созданием из шаблона.

use crate::error::{RorError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Шаблон, встроенный в бинарник. Используется, если `paths.default_shortcuts` не задан.
pub const BUNDLED_DEFAULT: &str = include_str!("../../assets/shortcuts.default");

/// Прочитать файл правил. Если файла нет - создать его из шаблона и прочитать;
/// если создать не вышло - прочитать сам шаблон.
pub fn load_shortcuts(path: &Path, default_path: Option<&Path>) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => return Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Файл правил {:?} не найден, создаём из шаблона", path);
            match bootstrap(path, default_path) {
                Ok(()) => match fs::read_to_string(path) {
                    Ok(text) => return Ok(text),
                    Err(e) => warn!("Созданный файл {:?} не читается: {}", path, e),
                },
                Err(e) => warn!("Не удалось создать {:?}: {}", path, e),
            }
        }
        Err(e) => warn!("Не удалось прочитать {:?}: {}, используем шаблон", path, e),
    }

    read_default(default_path)
}

fn bootstrap(path: &Path, default_path: Option<&Path>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    match default_path {
        Some(default_path) => fs::copy(default_path, path).map(|_| ()),
        None => fs::write(path, BUNDLED_DEFAULT),
    }
}

fn read_default(default_path: Option<&Path>) -> Result<String> {
    match default_path {
        Some(default_path) => fs::read_to_string(default_path).map_err(|source| RorError::ConfigRead {
            path: default_path.to_path_buf(),
            source,
        }),
        None => Ok(BUNDLED_DEFAULT.to_string()),
    }
}
