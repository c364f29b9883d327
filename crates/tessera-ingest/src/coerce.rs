//! Raw text to typed [`Value`] coercion

use chrono::NaiveDate;
use tessera_core::{FieldKind, Value};

/// Coerce a raw value to `kind`. Lists are split on commas and each trimmed
/// piece is coerced to the element kind.
///
/// On failure the offending text is returned (the element, for lists).
pub fn coerce(kind: &FieldKind, raw: &str) -> Result<Value, String> {
    match kind {
        FieldKind::ListOf(element) => raw
            .split(',')
            .map(|piece| coerce_scalar(element, piece.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        other => coerce_scalar(other, raw),
    }
}

fn coerce_scalar(kind: &FieldKind, raw: &str) -> Result<Value, String> {
    let fail = || raw.to_string();
    match kind {
        FieldKind::String => Ok(Value::String(raw.to_string())),
        FieldKind::Reference(_) => Ok(Value::Reference(raw.to_string())),
        FieldKind::Integer => raw.parse().map(Value::Integer).map_err(|_| fail()),
        FieldKind::Long => raw.parse().map(Value::Long).map_err(|_| fail()),
        FieldKind::Double => raw.parse().map(Value::Double).map_err(|_| fail()),
        // Lenient: anything but a case-insensitive "true" reads as false
        FieldKind::Boolean => Ok(Value::Boolean(raw.eq_ignore_ascii_case("true"))),
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| fail()),
        FieldKind::ListOf(_) => Err(fail()),
    }
}
