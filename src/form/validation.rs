use serde_json::Value;

use crate::domain::Rule;

use super::field::FieldState;

/// Typed value of `field`, or the message of the first rule it breaks.
pub fn check_field(field: &FieldState) -> Result<Value, String> {
    let value = field.current_value().map_err(|err| err.message)?;
    match field
        .schema
        .rules
        .iter()
        .find(|rule| !satisfies(rule, &value))
    {
        Some(rule) => Err(rule.message().to_string()),
        None => Ok(value),
    }
}

fn satisfies(rule: &Rule, value: &Value) -> bool {
    match rule {
        Rule::Required(_) => !is_blank(value),
        Rule::Min(min, _) => value.as_f64().is_none_or(|number| number >= *min),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldKind, FieldSchema};

    static COST: FieldSchema = FieldSchema::new("cost", "Cost", FieldKind::Decimal).rules(&[
        Rule::Required("Cost is required."),
        Rule::Min(0.0, "Cost cannot be negative."),
    ]);
    static STOCK: FieldSchema = FieldSchema::new("stock", "Stock", FieldKind::Decimal)
        .rules(&[Rule::Min(0.0, "Stock cannot be negative.")]);

    #[test]
    fn required_rule_fires_first() {
        let field = FieldState::new(&COST);
        assert_eq!(check_field(&field).unwrap_err(), "Cost is required.");
    }

    #[test]
    fn minimum_rule_rejects_negative() {
        let mut field = FieldState::new(&COST);
        field.set_text("-1");
        assert_eq!(check_field(&field).unwrap_err(), "Cost cannot be negative.");
    }

    #[test]
    fn zero_counts_as_present() {
        let mut field = FieldState::new(&COST);
        field.set_text("0");
        assert!(check_field(&field).is_ok());
    }

    #[test]
    fn minimum_rule_skips_empty_optional_field() {
        let field = FieldState::new(&STOCK);
        assert_eq!(check_field(&field), Ok(Value::Null));
    }

    #[test]
    fn coercion_error_wins_over_rules() {
        let mut field = FieldState::new(&COST);
        field.set_text("abc");
        assert_eq!(check_field(&field).unwrap_err(), "Cost: expected a number");
    }
}
