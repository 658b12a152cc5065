//! Static column metadata.

use std::fmt;

use crate::model::Variant;

/// Identifies a sortable column.
///
/// The string form matches the sort keys used by header annotations
/// (`"gt1"`, `"pack"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Name,
    Type,
    FirstMutation,
    SecondMutation,
    ThirdMutation,
    SanctuaryMushroom,
    SanctuaryLockout,
    Weight,
    PrimeWeight,
    Bite,
    Speed,
    Carry,
    Pack,
}

impl ColumnKey {
    /// Every key, in display order.
    pub const ALL: [ColumnKey; 13] = [
        Self::Name,
        Self::Type,
        Self::FirstMutation,
        Self::SecondMutation,
        Self::ThirdMutation,
        Self::SanctuaryMushroom,
        Self::SanctuaryLockout,
        Self::Weight,
        Self::PrimeWeight,
        Self::Bite,
        Self::Speed,
        Self::Carry,
        Self::Pack,
    ];

    /// Position of this key in [`ColumnKey::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Type => "type",
            Self::FirstMutation => "gt1",
            Self::SecondMutation => "gt2",
            Self::ThirdMutation => "gt3",
            Self::SanctuaryMushroom => "sancm",
            Self::SanctuaryLockout => "sanc",
            Self::Weight => "weight",
            Self::PrimeWeight => "primeweight",
            Self::Bite => "bite",
            Self::Speed => "speed",
            Self::Carry => "carry",
            Self::Pack => "pack",
        }
    }

    /// Looks up a key by its string form. Unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Static metadata for this key.
    pub fn column(&self) -> &'static Column {
        &COLUMNS[self.index()]
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a column's cells are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Name,
    Category,
    Percent,
    Number,
    Pair,
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub label: &'static str,
    /// Header tooltip text. Columns with a description get a tooltip trigger.
    pub description: Option<&'static str>,
    pub sortable: bool,
    pub kind: CellKind,
    /// Restricts the column to one variant; `None` shows it everywhere.
    pub only_in: Option<Variant>,
}

impl Column {
    pub fn is_visible_in(&self, variant: Variant) -> bool {
        self.only_in.is_none_or(|only| only == variant)
    }

    /// Numeric columns render in a fixed-width style.
    pub fn is_mono(&self) -> bool {
        !matches!(self.kind, CellKind::Name | CellKind::Category)
    }
}

const fn column(
    key: ColumnKey,
    label: &'static str,
    description: Option<&'static str>,
    kind: CellKind,
    only_in: Option<Variant>,
) -> Column {
    Column {
        key,
        label,
        description,
        sortable: true,
        kind,
        only_in,
    }
}

/// Every column, indexed by [`ColumnKey::index`].
pub static COLUMNS: [Column; 13] = [
    column(ColumnKey::Name, "Name", None, CellKind::Name, None),
    column(
        ColumnKey::Type,
        "Type",
        Some("Diet: 🍖 carnivore, 🌿 herbivore, 🥚 omnivore, 🤖 AI."),
        CellKind::Category,
        None,
    ),
    column(
        ColumnKey::FirstMutation,
        "1st Mut.",
        Some("Growth at which the first mutation slot unlocks."),
        CellKind::Percent,
        Some(Variant::Evrima),
    ),
    column(
        ColumnKey::SecondMutation,
        "2nd Mut.",
        Some("Growth at which the second mutation slot unlocks."),
        CellKind::Percent,
        Some(Variant::Evrima),
    ),
    column(
        ColumnKey::ThirdMutation,
        "3rd Mut.",
        Some("Growth at which the third mutation slot unlocks."),
        CellKind::Percent,
        Some(Variant::Evrima),
    ),
    column(
        ColumnKey::SanctuaryMushroom,
        "Sanct. 🍄",
        Some("Growth until which sanctuary mushrooms can be eaten."),
        CellKind::Percent,
        Some(Variant::Evrima),
    ),
    column(
        ColumnKey::SanctuaryLockout,
        "Sanct. Lock",
        Some("Growth at which sanctuaries lock you out."),
        CellKind::Percent,
        Some(Variant::Evrima),
    ),
    column(ColumnKey::Weight, "Weight (kg)", None, CellKind::Number, None),
    column(
        ColumnKey::PrimeWeight,
        "Prime (kg)",
        Some("Weight after reaching prime elder."),
        CellKind::Number,
        Some(Variant::Hordetest),
    ),
    column(ColumnKey::Bite, "Bite (N)", None, CellKind::Number, None),
    column(ColumnKey::Speed, "Speed (km/h)", None, CellKind::Number, None),
    column(
        ColumnKey::Carry,
        "Carry",
        Some("Heaviest carriable weight, as a share of own weight."),
        CellKind::Percent,
        None,
    ),
    column(
        ColumnKey::Pack,
        "Pack",
        Some("Group size: base / with the social mutation."),
        CellKind::Pair,
        None,
    ),
];

/// Columns shown for a variant, in display order.
pub fn visible_columns(variant: Variant) -> impl Iterator<Item = &'static Column> {
    COLUMNS.iter().filter(move |c| c.is_visible_in(variant))
}
