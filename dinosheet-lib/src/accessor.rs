//! Column key to sort value translation.
//!
//! This is the only place that reads raw record fields for sorting. The
//! formatter and comparator work on what comes out of here.

use std::borrow::Cow;

use crate::columns::ColumnKey;
use crate::model::{FieldValue, RawRecord, Record, normalize};
use crate::format::PLACEHOLDER;

/// A sort-comparable value extracted from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// No value for this key (unknown column).
    Missing,
    /// Lower-cased text.
    Text(String),
    /// Normalized number; `None` for empty or non-numeric input.
    Number(Option<f64>),
    /// Two-part value, compared element-wise.
    Pair(Option<f64>, Option<f64>),
}

impl SortValue {
    /// Nullish values always sort after everything else.
    pub fn is_nullish(&self) -> bool {
        match self {
            Self::Missing | Self::Number(None) | Self::Pair(None, None) => true,
            Self::Number(Some(n)) => n.is_nan(),
            Self::Text(s) => s.is_empty() || s == PLACEHOLDER,
            Self::Pair(..) => false,
        }
    }

    /// Text form used when a value is compared against text.
    pub(crate) fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(Some(n)) => Cow::Owned(n.to_string()),
            Self::Missing | Self::Number(None) | Self::Pair(..) => Cow::Borrowed(""),
        }
    }
}

fn number(value: &Option<FieldValue>) -> SortValue {
    SortValue::Number(normalize(value.as_ref()))
}

fn text(value: &Option<String>) -> SortValue {
    SortValue::Text(value.as_deref().unwrap_or_default().to_lowercase())
}

/// Extracts the sort value for `key` from a raw record.
pub(crate) fn extract(raw: &RawRecord, key: ColumnKey) -> SortValue {
    let gt = &raw.growth_thresholds;
    let st = &raw.stats;
    let pk = &raw.pack_size;
    match key {
        ColumnKey::Name => text(&raw.name),
        ColumnKey::Type => text(&raw.category),
        ColumnKey::FirstMutation => number(&gt.first_mutation),
        ColumnKey::SecondMutation => number(&gt.second_mutation),
        ColumnKey::ThirdMutation => number(&gt.third_mutation),
        ColumnKey::SanctuaryMushroom => number(&gt.sanctuary_mushroom),
        ColumnKey::SanctuaryLockout => number(&gt.sanctuary_lockout),
        ColumnKey::Weight => number(&st.weight_kg),
        ColumnKey::PrimeWeight => number(&st.weight_prime),
        ColumnKey::Bite => number(&st.bite_force_n),
        ColumnKey::Speed => number(&st.speed_kmh),
        ColumnKey::Carry => number(&st.carry_weight_perc),
        ColumnKey::Pack => SortValue::Pair(
            normalize(pk.base.as_ref()),
            normalize(pk.with_social.as_ref()),
        ),
    }
}

/// Sort value of a record for a known column.
pub fn value(record: &Record, key: ColumnKey) -> &SortValue {
    record.value(key)
}

/// Sort value of a record for a column given by name.
///
/// Unknown names yield [`SortValue::Missing`].
pub fn value_by_name<'a>(record: &'a Record, name: &str) -> &'a SortValue {
    static MISSING: SortValue = SortValue::Missing;
    match ColumnKey::parse(name) {
        Some(key) => record.value(key),
        None => &MISSING,
    }
}
