//! Event routing for sort headers and overlay triggers.
//!
//! The host translates its raw input (mouse, keyboard, terminal resize) into
//! [`UiEvent`]s. The dispatcher resolves triggers through the
//! [`TriggerRegistry`] and updates the sort controller and overlays. Geometry
//! comes back from the host through the [`Host`] trait, so the dispatcher
//! never touches a screen.

mod registry;

pub use registry::*;

use log::{debug, warn};

use crate::columns::ColumnKey;
use crate::overlay::{OverlayKind, Overlays, Rect, Size, place};
use crate::sort::SortController;

/// Geometry queries answered by the host.
pub trait Host {
    /// Current viewport size.
    fn viewport(&self) -> Size;

    /// Bounding box of a trigger element, if it is on screen.
    fn anchor(&self, trigger: &TriggerId) -> Option<Rect>;

    /// Size the overlay needs for this content.
    fn measure(&self, content: &OverlayContent) -> Size;
}

/// Input events, already resolved to triggers by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A sortable header was clicked. The key is the header's sort annotation.
    HeaderClick { key: String },
    /// A click anywhere else. `trigger` is the trigger under the pointer.
    Click {
        x: i32,
        y: i32,
        trigger: Option<TriggerId>,
    },
    PointerEnter(TriggerId),
    PointerLeave(TriggerId),
    Focus(TriggerId),
    Blur(TriggerId),
    Escape,
    Scroll,
    Resize(Size),
}

/// What changed while handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Update {
    /// Sort state changed; rows must be rendered again.
    pub resorted: bool,
    /// An overlay opened, moved or closed.
    pub overlays: bool,
}

impl Update {
    pub fn is_empty(&self) -> bool {
        !self.resorted && !self.overlays
    }
}

/// Routes events to the sort controller and the overlays.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: TriggerRegistry,
    overlays: Overlays,
}

impl Dispatcher {
    pub fn new(margin: i32) -> Self {
        Self {
            registry: TriggerRegistry::new(),
            overlays: Overlays::new(margin),
        }
    }

    pub fn registry_mut(&mut self) -> &mut TriggerRegistry {
        &mut self.registry
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut Overlays {
        &mut self.overlays
    }

    pub fn dispatch(&mut self, event: UiEvent, sort: &mut SortController, host: &dyn Host) -> Update {
        let mut update = Update::default();
        match event {
            UiEvent::HeaderClick { key } => {
                // A header click is also a click outside the popover.
                update.overlays = self.overlays.popover.hide();
                match ColumnKey::parse(&key) {
                    Some(column) if column.column().sortable => {
                        sort.click(column);
                        update.resorted = true;
                    }
                    _ => warn!("Ignoring click on unsortable header '{}'", key),
                }
            }
            UiEvent::Click { x, y, trigger } => {
                update.overlays = self.click(x, y, trigger, host);
            }
            UiEvent::PointerEnter(trigger) | UiEvent::Focus(trigger) => {
                let content = match self.registry.get(&trigger) {
                    Some(content @ OverlayContent::Tip(_)) => Some(content.clone()),
                    _ => None,
                };
                if let Some(content) = content {
                    update.overlays = self.open(trigger, content, host);
                }
            }
            UiEvent::PointerLeave(trigger) | UiEvent::Blur(trigger) => {
                if self.overlays.tooltip.is_open_for(&trigger) {
                    update.overlays = self.overlays.tooltip.hide();
                }
            }
            UiEvent::Escape | UiEvent::Scroll | UiEvent::Resize(_) => {
                update.overlays = self.overlays.close_all();
            }
        }
        update
    }

    /// Toggles the popover for a recommendation trigger, or closes it when the
    /// click landed outside both the popover and its trigger.
    fn click(&mut self, x: i32, y: i32, trigger: Option<TriggerId>, host: &dyn Host) -> bool {
        let target = trigger.and_then(|id| match self.registry.get(&id) {
            Some(content @ OverlayContent::Recommendations(_)) => Some((id, content.clone())),
            _ => None,
        });

        match target {
            Some((id, _)) if self.overlays.popover.is_open_for(&id) => self.overlays.popover.hide(),
            Some((id, content)) => self.open(id, content, host),
            None if self.overlays.popover.contains(x, y) => false,
            None => self.overlays.popover.hide(),
        }
    }

    fn open(&mut self, trigger: TriggerId, content: OverlayContent, host: &dyn Host) -> bool {
        let Some(anchor) = host.anchor(&trigger) else {
            debug!("Trigger {} is not on screen", trigger);
            return false;
        };
        let size = host.measure(&content);
        let placement = place(anchor, size, host.viewport(), self.overlays.margin());
        let kind = content.kind();
        self.overlays.get_mut(kind).show(trigger, content, placement, size);
        true
    }

    /// Closes overlays whose trigger disappeared in the last render.
    pub fn prune(&mut self) -> bool {
        let mut changed = false;
        for kind in [OverlayKind::Recommendations, OverlayKind::HeaderTip] {
            let overlay = self.overlays.get_mut(kind);
            let stale = overlay
                .current()
                .is_some_and(|open| !self.registry.contains(&open.trigger));
            if stale {
                changed |= overlay.hide();
            }
        }
        changed
    }

    pub fn close_all(&mut self) -> bool {
        self.overlays.close_all()
    }
}
