use std::path::PathBuf;
use thiserror::Error;

use crate::events::ActionId;

#[derive(Error, Debug)]
pub enum RorError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не удалось прочитать файл правил {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ошибка разбора правила: {0}")]
    RuleParse(#[from] RuleParseError),

    #[error("Не удалось захватить сочетание '{accelerator}': {reason}")]
    HotkeyGrab { accelerator: String, reason: String },

    #[error("Не удалось освободить сочетание '{accelerator}' (action {action}): {reason}")]
    HotkeyRelease {
        action: ActionId,
        accelerator: String,
        reason: String,
    },

    #[error("Ошибка оконного менеджера: {0}")]
    Window(String),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

/// Ошибка разбора одной строки файла правил. Строка пропускается, разбор продолжается.
#[derive(Error, Debug)]
pub enum RuleParseError {
    #[error("незакрытая кавычка")]
    UnterminatedQuote,

    #[error("пустое сочетание клавиш")]
    MissingAccelerator,

    #[error("не указана команда")]
    MissingCommand,

    #[error("некорректное регулярное выражение '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RorError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(RorError::DeviceNotFound(msg.into()))
    }

    pub fn grab<T>(accelerator: &str, reason: impl Into<String>) -> Result<T> {
        Err(RorError::HotkeyGrab {
            accelerator: accelerator.to_string(),
            reason: reason.into(),
        })
    }
}

pub type Result<T> = std::result::Result<T, RorError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! ror_error {
    (window, $($arg:tt)*) => {
        $crate::error::RorError::Window(format!($($arg)*))
    };
    (device_not_found, $($arg:tt)*) => {
        $crate::error::RorError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::RorError::Permission(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::RorError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::RorError::Internal(format!($($arg)*))
    };
}
