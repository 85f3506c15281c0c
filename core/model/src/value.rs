//! FILENAME: core/model/src/value.rs
//! PURPOSE: Defines the value a single record field can hold.
//! CONTEXT: Records coming from the host are loosely typed (string, number,
//! null or simply absent). `FieldValue` keeps that shape with strict,
//! type-sensitive equality, and `ValueKey` is the hashable form used to
//! bucket rows into groups.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label shown for a missing or null group value.
pub const BLANK_LABEL: &str = "(blank)";

/// The value stored under one field of a record.
///
/// A field that is not present at all is represented by the *absence* of a
/// value (`Option<&FieldValue>::None`), which is distinct from `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    /// Exact decimal, produced by precise-sum aggregation. Serialized as a
    /// decimal string so the host can keep full precision.
    #[serde(skip_deserializing)]
    Decimal(Decimal),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// The empty-string marker used when an equal-or-blank aggregate disagrees.
    pub fn blank() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view of the value, coercing numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Decimal(d) => d.to_f64(),
            FieldValue::Text(s) => parse_numeric_text(s),
            FieldValue::Null | FieldValue::Bool(_) => None,
        }
    }

    /// Exact decimal view of the value.
    ///
    /// Floats go through their shortest round-trip representation, so `0.1`
    /// becomes exactly `0.1` rather than the nearest binary fraction.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Decimal(d) => Some(*d),
            FieldValue::Number(n) => f64_to_decimal(*n),
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .ok()
            }
            FieldValue::Null | FieldValue::Bool(_) => None,
        }
    }

    /// True for values a numeric aggregation can use.
    pub fn is_numeric(&self) -> bool {
        match self {
            FieldValue::Number(n) => !n.is_nan(),
            FieldValue::Decimal(_) => true,
            FieldValue::Text(s) => parse_numeric_text(s).is_some(),
            FieldValue::Null | FieldValue::Bool(_) => false,
        }
    }

    /// Hashable key for grouping.
    pub fn key(&self) -> ValueKey {
        ValueKey::from(Some(self))
    }

    /// Returns the display value as a String.
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Null => BLANK_LABEL.to_string(),
            FieldValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            FieldValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Decimal(d) => d.normalize().to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

/// Display label for an optional value; missing and null render as `(blank)`.
pub fn display_label(value: Option<&FieldValue>) -> String {
    match value {
        Some(v) => v.display_value(),
        None => BLANK_LABEL.to_string(),
    }
}

fn parse_numeric_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn f64_to_decimal(n: f64) -> Option<Decimal> {
    if !n.is_finite() {
        return None;
    }
    // `{}` on f64 prints the shortest string that round-trips, never exponent form.
    Decimal::from_str(&format!("{}", n))
        .ok()
        .or_else(|| Decimal::from_f64(n))
}

// ============================================================================
// VALUE KEY
// ============================================================================

/// A normalized, hashable representation of an optional field value.
/// Used as the bucket key when rows are grouped.
///
/// Numbers hash by bit pattern; `-0.0` is folded into `0.0` and every NaN
/// shares one key, so NaN rows end up in a single group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Missing,
    Null,
    Bool(bool),
    Number(u64),
    Decimal(Decimal),
    Text(String),
}

impl From<Option<&FieldValue>> for ValueKey {
    fn from(value: Option<&FieldValue>) -> Self {
        match value {
            None => ValueKey::Missing,
            Some(FieldValue::Null) => ValueKey::Null,
            Some(FieldValue::Bool(b)) => ValueKey::Bool(*b),
            Some(FieldValue::Number(n)) => {
                if n.is_nan() {
                    ValueKey::Number(u64::MAX)
                } else if *n == 0.0 {
                    ValueKey::Number(0.0f64.to_bits())
                } else {
                    ValueKey::Number(n.to_bits())
                }
            }
            Some(FieldValue::Decimal(d)) => ValueKey::Decimal(*d),
            Some(FieldValue::Text(s)) => ValueKey::Text(s.clone()),
        }
    }
}

// ============================================================================
// ORDERING
// ============================================================================

/// Total order used for sorting: missing < null < numbers < text < booleans.
/// Numbers and decimals compare numerically with each other.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(va), Some(vb)) => match (va, vb) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,

            (FieldValue::Decimal(da), FieldValue::Decimal(db)) => da.cmp(db),
            (
                FieldValue::Number(_) | FieldValue::Decimal(_),
                FieldValue::Number(_) | FieldValue::Decimal(_),
            ) => {
                let na = va.as_f64().unwrap_or(f64::NAN);
                let nb = vb.as_f64().unwrap_or(f64::NAN);
                na.partial_cmp(&nb).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Number(_) | FieldValue::Decimal(_), _) => Ordering::Less,
            (_, FieldValue::Number(_) | FieldValue::Decimal(_)) => Ordering::Greater,

            (FieldValue::Text(ta), FieldValue::Text(tb)) => ta.cmp(tb),
            (FieldValue::Text(_), _) => Ordering::Less,
            (_, FieldValue::Text(_)) => Ordering::Greater,

            (FieldValue::Bool(ba), FieldValue::Bool(bb)) => ba.cmp(bb),
        },
    }
}
