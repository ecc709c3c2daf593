use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use crate::domain::{FieldKind, FieldSchema};

use super::error::FieldCoercionError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Edit buffer for one scalar field of the record form.
#[derive(Debug, Clone)]
pub struct FieldState {
    pub schema: &'static FieldSchema,
    buffer: String,
    error: Option<String>,
}

impl FieldState {
    pub fn new(schema: &'static FieldSchema) -> Self {
        let buffer = match schema.kind {
            FieldKind::Flag => "false".to_string(),
            _ => String::new(),
        };
        Self {
            schema,
            buffer,
            error: None,
        }
    }

    pub fn key(&self) -> &'static str {
        self.schema.key
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_editable(&self) -> bool {
        !self.schema.read_only
    }

    pub fn display_value(&self) -> String {
        match self.schema.kind {
            FieldKind::Flag if self.flag() => "[x]".to_string(),
            FieldKind::Flag => "[ ]".to_string(),
            _ => self.buffer.clone(),
        }
    }

    pub fn seed(&mut self, value: Option<&Value>) {
        self.buffer = match (self.schema.kind, value) {
            (FieldKind::Flag, Some(Value::Bool(flag))) => flag.to_string(),
            (FieldKind::Flag, _) => "false".to_string(),
            (_, Some(value)) => value_to_string(value),
            (_, None) => String::new(),
        };
        self.error = None;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.error = None;
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.schema.read_only {
            return false;
        }
        let changed = match self.schema.kind {
            FieldKind::Flag => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    self.buffer = (!self.flag()).to_string();
                    true
                }
                _ => false,
            },
            kind => handle_text_edit(&mut self.buffer, kind, key),
        };
        if changed {
            self.error = None;
        }
        changed
    }

    /// Typed value of the buffer; `Null` for an empty numeric field.
    pub fn current_value(&self) -> Result<Value, FieldCoercionError> {
        let trimmed = self.buffer.trim();
        match self.schema.kind {
            FieldKind::Text | FieldKind::Lookup => Ok(Value::String(trimmed.to_string())),
            FieldKind::Flag => Ok(Value::Bool(self.flag())),
            _ if trimmed.is_empty() => Ok(match self.schema.kind {
                FieldKind::Date => Value::String(String::new()),
                _ => Value::Null,
            }),
            FieldKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.coercion_error("expected a whole number")),
            FieldKind::Decimal => parse_decimal(trimmed)
                .map(Value::from)
                .ok_or_else(|| self.coercion_error("expected a number")),
            FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
                .map_err(|_| self.coercion_error("expected a date (YYYY-MM-DD)")),
        }
    }

    fn flag(&self) -> bool {
        self.buffer == "true"
    }

    fn coercion_error(&self, detail: &str) -> FieldCoercionError {
        FieldCoercionError {
            key: self.schema.key.to_string(),
            message: format!("{}: {detail}", self.schema.label),
        }
    }
}

pub(crate) fn handle_text_edit(buffer: &mut String, kind: FieldKind, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Left => adjust_numeric_value(buffer, kind, -1),
        KeyCode::Right => adjust_numeric_value(buffer, kind, 1),
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            buffer.push(ch);
            true
        }
        KeyCode::Backspace => buffer.pop().is_some(),
        KeyCode::Delete => {
            let changed = !buffer.is_empty();
            buffer.clear();
            changed
        }
        _ => false,
    }
}

/// Accepts both `.` and `,` as decimal separator.
pub(crate) fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub(crate) fn format_decimal(value: f64) -> String {
    value.to_string()
}

fn adjust_numeric_value(buffer: &mut String, kind: FieldKind, delta: i64) -> bool {
    match kind {
        FieldKind::Integer => {
            let current = buffer.trim().parse::<i64>().unwrap_or(0);
            *buffer = current.saturating_add(delta).to_string();
            true
        }
        FieldKind::Decimal => {
            let current = parse_decimal(buffer).unwrap_or(0.0);
            *buffer = format_decimal(current + delta as f64);
            true
        }
        _ => false,
    }
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => match num.as_i64() {
            Some(int) => int.to_string(),
            None => num.as_f64().map(format_decimal).unwrap_or_default(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    static PRICE: FieldSchema = FieldSchema::new("price", "Price", FieldKind::Decimal);
    static DATE: FieldSchema = FieldSchema::new("delivery_date", "Delivery date", FieldKind::Date);
    static PAID: FieldSchema = FieldSchema::new("paid", "Paid", FieldKind::Flag);
    static CODE: FieldSchema = FieldSchema::new("id", "Code", FieldKind::Integer).read_only();

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn decimal_seeds_without_trailing_zero() {
        let mut field = FieldState::new(&PRICE);
        field.seed(Some(&json!(2.0)));
        assert_eq!(field.buffer(), "2");
        field.seed(Some(&json!(2.5)));
        assert_eq!(field.buffer(), "2.5");
    }

    #[test]
    fn decimal_accepts_comma_separator() {
        let mut field = FieldState::new(&PRICE);
        field.set_text("3,25");
        assert_eq!(field.current_value().expect("value"), json!(3.25));
    }

    #[test]
    fn empty_decimal_is_null() {
        let field = FieldState::new(&PRICE);
        assert_eq!(field.current_value().expect("value"), Value::Null);
    }

    #[test]
    fn invalid_date_reports_label() {
        let mut field = FieldState::new(&DATE);
        field.set_text("31/12/2026");
        let err = field.current_value().unwrap_err();
        assert_eq!(err.message, "Delivery date: expected a date (YYYY-MM-DD)");
    }

    #[test]
    fn flag_toggles_with_space() {
        let mut field = FieldState::new(&PAID);
        assert_eq!(field.display_value(), "[ ]");
        assert!(field.handle_key(&key(KeyCode::Char(' '))));
        assert_eq!(field.current_value().expect("value"), json!(true));
        assert_eq!(field.display_value(), "[x]");
    }

    #[test]
    fn read_only_field_ignores_input() {
        let mut field = FieldState::new(&CODE);
        assert!(!field.handle_key(&key(KeyCode::Char('9'))));
        assert_eq!(field.buffer(), "");
    }

    #[test]
    fn arrows_step_numbers() {
        let mut field = FieldState::new(&PRICE);
        field.set_text("1.5");
        assert!(field.handle_key(&key(KeyCode::Right)));
        assert_eq!(field.buffer(), "2.5");
    }
}
