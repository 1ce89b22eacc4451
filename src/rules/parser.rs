use crate::error::RuleParseError;
use std::fmt;

use super::{Matcher, Mode, ModeSet, ModeValue, Rule};

/// Результат разбора файла: успешно разобранные правила и ошибки по строкам
#[derive(Debug, Default)]
pub struct ParseReport {
    pub rules: Vec<Rule>,
    pub errors: Vec<LineError>,
}

#[derive(Debug)]
pub struct LineError {
    pub line: usize,
    pub text: String,
    pub error: RuleParseError,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "строка {}: {} ({})", self.line, self.error, self.text.trim())
    }
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Разобрать текст файла правил. Ошибка в строке не прерывает разбор остальных.
pub fn parse(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for (index, line) in text.lines().enumerate() {
        let line_num = index + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(line, line_num) {
            Ok(rule) => report.rules.push(rule),
            Err(error) => {
                tracing::warn!("Строка {} пропущена ({}): {}", line_num, error, trimmed);
                report.errors.push(LineError {
                    line: line_num,
                    text: line.to_string(),
                    error,
                });
            }
        }
    }

    report
}

fn parse_line(line: &str, line_num: usize) -> Result<Rule, RuleParseError> {
    let fields = split_fields(line)?;

    let (accelerator, mut modes) = ModeSet::parse_token(&fields[0]);
    if accelerator.is_empty() {
        return Err(RuleParseError::MissingAccelerator);
    }

    let command = fields.get(1).ok_or(RuleParseError::MissingCommand)?.clone();
    let class_matcher = Matcher::classify(fields.get(2).map(String::as_str).unwrap_or(""))?;
    let title_matcher = Matcher::classify(fields.get(3).map(String::as_str).unwrap_or(""))?;

    if fields.len() > 4 {
        tracing::debug!("Строка {}: лишние поля проигнорированы", line_num);
    }

    // Без класса и заголовка окно не ищется - только запуск
    if fields.len() <= 2 {
        modes.insert(Mode::RunOnly, ModeValue::Enabled);
    }

    Ok(Rule {
        accelerator,
        command,
        class_matcher,
        title_matcher,
        modes,
        line: line_num,
    })
}

/// Разделить строку по запятым вне кавычек: запятая - разделитель, только если
/// перед ней чётное число `"`. Поля обрезаются, одна пара обрамляющих кавычек снимается.
fn split_fields(line: &str) -> Result<Vec<String>, RuleParseError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quotes = 0usize;

    for ch in line.chars() {
        match ch {
            ',' if quotes % 2 == 0 => fields.push(clean_field(&std::mem::take(&mut current))),
            '"' => {
                quotes += 1;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if quotes % 2 != 0 {
        return Err(RuleParseError::UnterminatedQuote);
    }

    fields.push(clean_field(&current));
    Ok(fields)
}

fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}
