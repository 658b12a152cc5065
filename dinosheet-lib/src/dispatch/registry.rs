//! Registry of interactive trigger elements.

use std::collections::HashMap;
use std::fmt;

use crate::overlay::OverlayKind;

/// Identifies a trigger element in the rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerId(String);

impl TriggerId {
    /// Recommendation trigger of the row with this `original_index`.
    pub fn recommendations(original_index: usize) -> Self {
        Self(format!("rec-{original_index}"))
    }

    /// Tooltip trigger of a header.
    pub fn header_tip(name: &str) -> Self {
        Self(format!("tip-{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an overlay shows for a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayContent {
    /// Recommendation list, in feed order.
    Recommendations(Vec<String>),
    /// Header tooltip text.
    Tip(String),
}

impl OverlayContent {
    /// The overlay instance this content belongs in.
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::Recommendations(_) => OverlayKind::Recommendations,
            Self::Tip(_) => OverlayKind::HeaderTip,
        }
    }

    /// Content as display lines.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Recommendations(items) => items.iter().map(String::as_str).collect(),
            Self::Tip(text) => vec![text.as_str()],
        }
    }
}

/// Active triggers and their overlay content.
///
/// Rebuilt on every render, so it always matches the rows on screen.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    content: HashMap<TriggerId, OverlayContent>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Registers a trigger, replacing any content it already had.
    pub fn register(&mut self, id: TriggerId, content: OverlayContent) {
        self.content.insert(id, content);
    }

    pub fn get(&self, id: &TriggerId) -> Option<&OverlayContent> {
        self.content.get(id)
    }

    pub fn contains(&self, id: &TriggerId) -> bool {
        self.content.contains_key(id)
    }
}
