//! Tri-state header sorting.

use std::cmp::Ordering;

use log::debug;

use crate::columns::ColumnKey;
use crate::compare::compare;
use crate::model::Record;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A freshly activated column starts descending, so the largest values come
/// first.
pub const FIRST_DIRECTION: SortDirection = SortDirection::Descending;

/// Direction after [`FIRST_DIRECTION`].
pub const SECOND_DIRECTION: SortDirection = SortDirection::Ascending;

/// Current sort key and direction.
///
/// Either both are set or neither is; the empty state means original order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<(ColumnKey, SortDirection)>,
}

impl SortState {
    pub fn new(key: ColumnKey, direction: SortDirection) -> Self {
        Self {
            active: Some((key, direction)),
        }
    }

    pub fn key(&self) -> Option<ColumnKey> {
        self.active.map(|(key, _)| key)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.map(|(_, direction)| direction)
    }

    /// Returns `true` when rows are shown in original order.
    pub fn is_default(&self) -> bool {
        self.active.is_none()
    }

    /// Header indicator for a column: `"asc"`, `"desc"` or `"none"`.
    pub fn indicator(&self, key: ColumnKey) -> &'static str {
        match self.active {
            Some((active, direction)) if active == key => direction.as_str(),
            _ => "none",
        }
    }
}

/// Owns the sort state and orders records for display.
#[derive(Debug, Default)]
pub struct SortController {
    state: SortState,
}

impl SortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SortState {
        self.state
    }

    /// Advances the state machine for a header click and returns the new state.
    ///
    /// A new column starts at [`FIRST_DIRECTION`], a second click switches to
    /// [`SECOND_DIRECTION`], and a third click restores original order.
    pub fn click(&mut self, key: ColumnKey) -> SortState {
        self.state = match self.state.active {
            Some((active, FIRST_DIRECTION)) if active == key => {
                SortState::new(key, SECOND_DIRECTION)
            }
            Some((active, _)) if active == key => SortState::default(),
            _ => SortState::new(key, FIRST_DIRECTION),
        };
        debug!(
            "Sort state: key={:?} direction={:?}",
            self.state.key(),
            self.state.direction()
        );
        self.state
    }

    /// Restores original order.
    pub fn reset(&mut self) {
        self.state = SortState::default();
    }

    /// Returns the records in display order.
    ///
    /// The sort is stable, so equal keys keep their relative input order.
    pub fn order<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let mut ordered: Vec<&Record> = records.iter().collect();
        match self.state.active {
            None => ordered.sort_by_key(|r| r.original_index()),
            Some((key, direction)) => {
                ordered.sort_by(|a, b| compare(a.value(key), b.value(key), direction))
            }
        }
        ordered
    }
}
