use regex::Regex;

use crate::error::RuleParseError;

/// Условие на класс или заголовок окна.
///
/// `None` означает, что поле в правиле не задано: такой матчер никогда не срабатывает.
#[derive(Debug, Clone)]
pub enum Matcher {
    None,
    Literal(String),
    Regex(Regex),
}

impl Matcher {
    /// Определить вид матчера по тексту поля: пусто - `None`, `/…/` - регулярное
    /// выражение, всё остальное - подстрока как есть.
    pub fn classify(field: &str) -> Result<Self, RuleParseError> {
        if field.is_empty() {
            return Ok(Matcher::None);
        }

        if field.len() >= 2 && field.starts_with('/') && field.ends_with('/') {
            let pattern = &field[1..field.len() - 1];
            let regex = Regex::new(pattern).map_err(|source| RuleParseError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;
            return Ok(Matcher::Regex(regex));
        }

        Ok(Matcher::Literal(field.to_string()))
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Matcher::None)
    }

    /// Регистрозависимое совпадение в любом месте строки
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::None => false,
            Matcher::Literal(pattern) => candidate.contains(pattern.as_str()),
            Matcher::Regex(regex) => regex.is_match(candidate),
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        match self {
            Matcher::None => None,
            Matcher::Literal(pattern) => Some(pattern),
            Matcher::Regex(regex) => Some(regex.as_str()),
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Matcher::None, Matcher::None) => true,
            (Matcher::Literal(a), Matcher::Literal(b)) => a == b,
            (Matcher::Regex(a), Matcher::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for Matcher {}
