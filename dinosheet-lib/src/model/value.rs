//! Raw field values as they appear in a feed.

use std::borrow::Cow;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// A single raw field value.
///
/// Feeds are hand-edited, so a field may hold a number, a quoted string, a
/// boolean, or something structurally wrong. Nothing here ever fails a load:
/// anything unrecognised lands in [`FieldValue::Other`] and is displayed as the
/// placeholder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

impl FieldValue {
    /// Plain textual form of the value, without trimming.
    ///
    /// Numbers use the shortest form that round-trips, so `50.0` reads as
    /// `50` and `33.3` as `33.3`.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Flag(b) => Some(Cow::Owned(b.to_string())),
            Self::Other(_) => None,
        }
    }

    /// Returns `true` if the value carries nothing to display.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Other(_) => true,
            Self::Number(_) | Self::Flag(_) => false,
        }
    }

    /// Normalizes the value to a finite number.
    ///
    /// Strings are parsed after trimming. Booleans, non-finite numbers and
    /// anything unparseable become `None`, never NaN.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Self::Text(s) => parse_number(s),
            Self::Flag(_) | Self::Other(_) => None,
        }
    }
}

/// Normalizes an optional field to a finite number.
pub fn normalize(value: Option<&FieldValue>) -> Option<f64> {
    value.and_then(FieldValue::as_number)
}

/// Parses a decimal number from text, accepting surrounding whitespace.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Deserializes `T`, falling back to `T::default()` when the input has the
/// wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Value(T),
        Other(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => value,
        Lenient::Other(_) => T::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_text_drops_trailing_zero() {
        assert_eq!(FieldValue::Number(50.0).text().as_deref(), Some("50"));
        assert_eq!(FieldValue::Number(33.3).text().as_deref(), Some("33.3"));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(FieldValue::Text(" 12.5 ".into()).as_number(), Some(12.5));
        assert_eq!(FieldValue::Text("abc".into()).as_number(), None);
        assert_eq!(FieldValue::Text("".into()).as_number(), None);
        assert_eq!(FieldValue::Text("inf".into()).as_number(), None);
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Flag(true).as_number(), None);
    }

    #[test]
    fn test_blank() {
        assert!(FieldValue::Text("   ".into()).is_blank());
        assert!(FieldValue::Other(IgnoredAny).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }
}
