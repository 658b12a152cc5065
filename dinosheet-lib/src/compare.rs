//! Ordering over sort values.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::accessor::SortValue;
use crate::sort::SortDirection;

/// Direction-aware comparison that always sends nullish values to the bottom.
///
/// When exactly one side is nullish it sorts last in both directions.
/// Otherwise the base ordering is reversed for descending sorts.
pub fn compare(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    match (a.is_nullish(), b.is_nullish()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
        (false, false) => direction.apply(compare_base(a, b)),
    }
}

/// Ascending order between two values, ignoring nullishness at the top level.
///
/// Pairs compare element-wise, text compares in natural order, and numbers
/// compare numerically.
pub fn compare_base(a: &SortValue, b: &SortValue) -> Ordering {
    if matches!(a, SortValue::Pair(..)) || matches!(b, SortValue::Pair(..)) {
        let left = elements(a);
        let right = elements(b);
        let len = left.len().max(right.len());
        return (0..len)
            .map(|i| {
                let x = left.get(i).unwrap_or(&SortValue::Missing);
                let y = right.get(i).unwrap_or(&SortValue::Missing);
                compare_element(x, y)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal);
    }

    match (a, b) {
        (SortValue::Text(_), _) | (_, SortValue::Text(_)) => natural_cmp(&a.text(), &b.text()),
        (SortValue::Number(Some(x)), SortValue::Number(Some(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => Ordering::Equal,
    }
}

/// Splits a value into tuple elements; non-pairs become one-element tuples.
fn elements(value: &SortValue) -> Vec<SortValue> {
    match value {
        SortValue::Pair(x, y) => vec![SortValue::Number(*x), SortValue::Number(*y)],
        other => vec![other.clone()],
    }
}

/// An absent element orders after a present one.
fn compare_element(x: &SortValue, y: &SortValue) -> Ordering {
    match (x.is_nullish(), y.is_nullish()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
        (false, false) => compare_base(x, y),
    }
}

/// Case-insensitive comparison where digit runs compare by numeric value, so
/// `"item 9"` sorts before `"item 10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        let (x, y) = match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => (x, y),
        };

        let ord = if x.is_ascii_digit() && y.is_ascii_digit() {
            compare_digit_runs(&take_digits(&mut a), &take_digits(&mut b))
        } else {
            a.next();
            b.next();
            x.to_lowercase().cmp(y.to_lowercase())
        };

        if ord.is_ne() {
            return ord;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}
