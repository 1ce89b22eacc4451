use crate::error::{RorError, Result};
use std::fs;
use tracing::{info, warn};

/// Проверить доступ к устройствам ввода для чтения горячих клавиш
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !std::path::Path::new(input_dir).exists() {
        return Err(RorError::Permission(format!(
            "Директория {} не существует",
            input_dir
        )));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir);
            Ok(())
        }
        Err(e) => Err(RorError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir, e
        ))),
    }
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Запущенные команды тоже получат права root.");
            warn!("   Добавьте пользователя в группу 'input': {}", SETUP_COMMAND);
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

/// Команда, дающая доступ к клавиатуре без root
pub const SETUP_COMMAND: &str = "sudo usermod -a -G input $USER";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_command() {
        assert!(SETUP_COMMAND.contains("usermod"));
        assert!(SETUP_COMMAND.contains("input"));
    }
}
