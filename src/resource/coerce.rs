//! Best-effort value coercion for sheet cells.

use crate::design::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A coerced field: an integer when the cell reads as one, otherwise the
/// original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn is_integer(&self) -> bool {
        matches!(self, FieldValue::Integer(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// How eagerly a cell is read as a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Anything that parses as a finite number, truncated (`"4.0"`, `"-2"`, `"1e3"`)
    Numeric,
    /// Only plain digit strings with at most one decimal point (`"4"`, `"4.0"`)
    PlainDigits,
}

/// Coerce a cell. Returns `None` only for blank cells; a value that does not
/// read as an integer comes back as [`FieldValue::Text`] unchanged.
pub fn coerce(cell: &Cell, mode: Coercion) -> Option<FieldValue> {
    let text = cell.as_text()?;
    let numeric = match mode {
        Coercion::Numeric => true,
        Coercion::PlainDigits => is_plain_number(&text),
    };

    let value = numeric
        .then(|| text.parse::<f64>().ok())
        .flatten()
        .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
        .map(|f| FieldValue::Integer(f.trunc() as i64))
        .unwrap_or(FieldValue::Text(text));
    Some(value)
}

fn is_plain_number(text: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for c in text.chars() {
        match c {
            '.' => dots += 1,
            c if c.is_ascii_digit() => digits += 1,
            _ => return false,
        }
    }
    dots <= 1 && digits > 0
}
