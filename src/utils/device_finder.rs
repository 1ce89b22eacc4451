use crate::error::{RorError, Result};
use evdev::KeyCode;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру для чтения горячих клавиш: явный путь или `auto`
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                RorError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Начинаем автопоиск клавиатурного устройства...");

        let mut candidates = Self::candidates(Path::new("/dev/input/by-id"), |name| {
            name.ends_with("-event-kbd")
        });
        candidates.extend(Self::candidates(Path::new("/dev/input"), |name| {
            name.starts_with("event")
        }));

        candidates
            .into_iter()
            .find(|path| Self::is_keyboard_device(path))
            .ok_or_else(|| {
                RorError::DeviceNotFound(
                    "Не удалось найти клавиатуру. Убедитесь, что пользователь в группе 'input'"
                        .to_string(),
                )
            })
    }

    fn candidates(dir: &Path, accept: impl Fn(&str) -> bool) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Нет доступа к {:?}: {}", dir, e);
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(&accept)
            })
            .collect();
        paths.sort();
        paths
    }

    fn is_keyboard_device(device_path: &Path) -> bool {
        let device = match evdev::Device::open(device_path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                return false;
            }
        };

        let name = device.name().unwrap_or("Unknown").to_lowercase();
        if ["mouse", "touchpad", "trackpoint"].iter().any(|m| name.contains(m)) {
            debug!("Исключаем устройство как мышь/тачпад: {:?} ({})", device_path, name);
            return false;
        }

        // У настоящей клавиатуры есть буквы, модификаторы и много клавиш вообще
        let is_keyboard = device.supported_keys().is_some_and(|keys| {
            keys.contains(KeyCode::KEY_A)
                && keys.contains(KeyCode::KEY_LEFTMETA)
                && keys.contains(KeyCode::KEY_ENTER)
                && keys.iter().count() > 20
        });

        if is_keyboard {
            info!("Устройство {:?} ({}) подходит как клавиатура", device_path, name);
        }
        is_keyboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyboard_device_with_specific_path() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/path");
        assert!(matches!(result, Err(RorError::DeviceNotFound(_))));
    }

    #[test]
    fn test_candidates_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["event3", "event1", "mouse0", "js0"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let found = DeviceFinder::candidates(dir.path(), |name| name.starts_with("event"));
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["event1", "event3"]);
    }

    #[test]
    fn test_candidates_in_missing_dir_is_empty() {
        assert!(DeviceFinder::candidates(Path::new("/non/existent"), |_| true).is_empty());
    }
}
