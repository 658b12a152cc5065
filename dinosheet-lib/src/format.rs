//! Display formatting for raw field values.
//!
//! Every function here is total: missing or malformed input renders as
//! [`PLACEHOLDER`] instead of failing.

use crate::model::{Category, FieldValue, normalize};

/// Shown for any absent or unusable value.
pub const PLACEHOLDER: &str = "—";

/// Formats a percentage.
///
/// If the source text has a decimal point the value keeps one fractional
/// digit (a trailing `.0` is dropped), otherwise it is rendered as an integer.
/// Values outside 0-100 pass through unchanged.
pub fn format_percent(value: Option<&FieldValue>) -> String {
    let Some(value) = value.filter(|v| !v.is_blank()) else {
        return PLACEHOLDER.to_string();
    };
    let Some(text) = value.text() else {
        return PLACEHOLDER.to_string();
    };
    let text = text.trim();
    let Some(n) = value.as_number() else {
        return PLACEHOLDER.to_string();
    };

    if text.contains('.') {
        let fixed = to_fixed(n, 1);
        let fixed = fixed.strip_suffix(".0").unwrap_or(&fixed);
        format!("{fixed}%")
    } else {
        format!("{}%", to_fixed(n, 0))
    }
}

/// Formats `n` with `digits` fraction digits, rounding exact ties away from
/// zero.
///
/// `format!` rounds ties to even. A tie is only representable when `n` is an
/// odd multiple of `2^-(digits + 1)`, so everything else goes through it
/// unchanged.
fn to_fixed(n: f64, digits: u32) -> String {
    let units = n * f64::from(2u32.pow(digits + 1));
    let precision = digits as usize;
    if units.fract() == 0.0 && (units % 2.0).abs() == 1.0 {
        let scale = f64::from(10u32.pow(digits));
        format!("{:.*}", precision, (n * scale).round() / scale)
    } else {
        format!("{:.*}", precision, n)
    }
}

/// Formats a plain number as written in the feed.
pub fn format_number(value: Option<&FieldValue>) -> String {
    match value.filter(|v| !v.is_blank()).and_then(FieldValue::text) {
        Some(text) => text.into_owned(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Formats two numbers as `"A / B"`.
///
/// Each side falls back to the placeholder on its own; when both are absent
/// the result is a single placeholder.
pub fn format_pair(a: Option<&FieldValue>, b: Option<&FieldValue>) -> String {
    let side = |n: Option<f64>| n.map_or_else(|| PLACEHOLDER.to_string(), |n| n.to_string());
    match (normalize(a), normalize(b)) {
        (None, None) => PLACEHOLDER.to_string(),
        (a, b) => format!("{} / {}", side(a), side(b)),
    }
}

/// Maps a category tag to its icon.
pub fn format_category(tag: Option<&str>) -> &'static str {
    tag.and_then(Category::from_tag)
        .map_or(PLACEHOLDER, |category| category.icon())
}

pub fn format_name(name: Option<&str>) -> &str {
    name.filter(|n| !n.is_empty()).unwrap_or(PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_percent_trims_trailing_zero() {
        assert_eq!(format_percent(Some(&text("50.0"))), "50%");
        assert_eq!(format_percent(Some(&text("33.3"))), "33.3%");
        assert_eq!(format_percent(Some(&text("33.34"))), "33.3%");
        assert_eq!(format_percent(Some(&text(" 40 "))), "40%");
    }

    #[test]
    fn test_percent_ties_round_up() {
        assert_eq!(format_percent(Some(&text("12.25"))), "12.3%");
        assert_eq!(format_percent(Some(&text("0.25"))), "0.3%");
        assert_eq!(format_percent(Some(&text("72.75"))), "72.8%");
        assert_eq!(format_percent(Some(&text("0.95"))), "0.9%");
        assert_eq!(format_percent(Some(&FieldValue::Number(12.25))), "12.3%");
        assert_eq!(format_percent(Some(&text("-0.25"))), "-0.3%");
    }

    #[test]
    fn test_percent_numbers() {
        assert_eq!(format_percent(Some(&FieldValue::Number(50.0))), "50%");
        assert_eq!(format_percent(Some(&FieldValue::Number(72.5))), "72.5%");
    }

    #[test]
    fn test_percent_passes_out_of_range_through() {
        assert_eq!(format_percent(Some(&FieldValue::Number(140.0))), "140%");
        assert_eq!(format_percent(Some(&text("-5"))), "-5%");
    }

    #[test]
    fn test_percent_placeholder() {
        assert_eq!(format_percent(None), PLACEHOLDER);
        assert_eq!(format_percent(Some(&text(""))), PLACEHOLDER);
        assert_eq!(format_percent(Some(&text("n/a"))), PLACEHOLDER);
        assert_eq!(format_percent(Some(&FieldValue::Flag(true))), PLACEHOLDER);
    }

    #[test]
    fn test_percent_suffix_property() {
        for input in ["0", "1.5", "99.9", "100", "250", "1e2", "0.04"] {
            assert!(format_percent(Some(&text(input))).ends_with('%'), "{input}");
        }
    }

    #[test]
    fn test_number_is_verbatim() {
        assert_eq!(format_number(Some(&FieldValue::Number(3000.0))), "3000");
        assert_eq!(format_number(Some(&text("1,500"))), "1,500");
        assert_eq!(format_number(Some(&FieldValue::Number(12.25))), "12.25");
        assert_eq!(format_number(None), PLACEHOLDER);
        assert_eq!(format_number(Some(&text(""))), PLACEHOLDER);
    }

    #[test]
    fn test_pair() {
        let two = FieldValue::Number(2.0);
        let four = text("4");
        assert_eq!(format_pair(Some(&two), Some(&four)), "2 / 4");
        assert_eq!(format_pair(Some(&two), None), "2 / —");
        assert_eq!(format_pair(None, Some(&four)), "— / 4");
        assert_eq!(format_pair(None, None), PLACEHOLDER);
        assert_eq!(format_pair(Some(&text("x")), None), PLACEHOLDER);
    }

    #[test]
    fn test_category() {
        assert_eq!(format_category(Some("Herbivore")), "🌿");
        assert_eq!(format_category(Some("AI")), "🤖");
        assert_eq!(format_category(Some("Piscivore")), PLACEHOLDER);
        assert_eq!(format_category(None), PLACEHOLDER);
    }

    #[test]
    fn test_name() {
        assert_eq!(format_name(Some("Omniraptor")), "Omniraptor");
        assert_eq!(format_name(Some("")), PLACEHOLDER);
        assert_eq!(format_name(None), PLACEHOLDER);
    }
}
