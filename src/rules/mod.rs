//! Правила горячих клавиш: грамматика файла, матчеры окон и режимы.
//!
//! Формат строки:
//! ```text
//! accelerator[:mode[(arg)]]*, command [, wm_class [, title]]
//! ```

mod matcher;
mod modes;
mod parser;

pub use matcher::Matcher;
pub use modes::{Mode, ModeSet, ModeValue};
pub use parser::{parse, LineError};

use std::fmt;

/// Одна строка файла правил после разбора. Неизменяема.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub accelerator: String,
    pub command: String,
    pub class_matcher: Matcher,
    pub title_matcher: Matcher,
    pub modes: ModeSet,
    /// Номер строки в файле (с единицы), для диагностики
    pub line: usize,
}

impl Rule {
    pub fn has(&self, mode: Mode) -> bool {
        self.modes.contains(mode)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> '{}'", self.accelerator, self.command)?;
        if let Some(class) = self.class_matcher.pattern() {
            write!(f, " class={}", class)?;
        }
        if let Some(title) = self.title_matcher.pattern() {
            write!(f, " title={}", title)?;
        }
        if !self.modes.is_empty() {
            write!(f, " [{}]", self.modes)?;
        }
        Ok(())
    }
}
