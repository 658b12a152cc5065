//! Floating overlays anchored to trigger elements.
//!
//! Two overlay kinds exist, each with a single shared instance: the
//! recommendation popover and the header tooltip. Showing one for a new
//! trigger moves it; overlays never stack.
//!
//! Placement prefers the space below the trigger and flips above it when the
//! overlay would run off the bottom of the viewport:
//!
//! ```
//! use dinosheet_lib::overlay::{Rect, Size, place};
//!
//! let viewport = Size::new(800, 600);
//! let trigger = Rect::new(100, 570, 20, 20);
//! let placed = place(trigger, Size::new(200, 100), viewport, 8);
//! assert!(placed.top < trigger.top());
//! ```

use log::debug;

use crate::dispatch::{OverlayContent, TriggerId};

/// Default gap between a trigger, its overlay and the viewport edges.
pub const DEFAULT_MARGIN: i32 = 8;

/// An axis-aligned rectangle in host units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A width and height in host units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a placed overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub left: i32,
    pub top: i32,
}

/// Computes where to put an overlay of `size` next to `anchor`.
///
/// The left edge follows the anchor but is clamped to
/// `[margin, viewport.width - size.width - margin]`, with the lower bound
/// winning when the overlay is wider than the viewport. Vertically the overlay
/// goes below the anchor, flips above it on bottom overflow, and is clamped to
/// the top margin if the flip leaves the viewport.
pub fn place(anchor: Rect, size: Size, viewport: Size, margin: i32) -> Placement {
    let left = anchor
        .left()
        .min(viewport.width - size.width - margin)
        .max(margin);

    let mut top = anchor.bottom() + margin;
    if top + size.height > viewport.height {
        top = anchor.top() - size.height - margin;
    }
    if top < margin {
        top = margin;
    }

    Placement { left, top }
}

/// Which shared overlay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Recommendations,
    HeaderTip,
}

/// An overlay currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOverlay {
    pub trigger: TriggerId,
    pub content: OverlayContent,
    pub placement: Placement,
    pub size: Size,
}

impl OpenOverlay {
    /// Screen area covered by the overlay.
    pub fn area(&self) -> Rect {
        Rect::new(
            self.placement.left,
            self.placement.top,
            self.size.width,
            self.size.height,
        )
    }
}

/// One shared overlay instance and the trigger that owns it, if any.
#[derive(Debug, Clone)]
pub struct Overlay {
    kind: OverlayKind,
    open: Option<OpenOverlay>,
}

impl Overlay {
    pub fn new(kind: OverlayKind) -> Self {
        Self { kind, open: None }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn current(&self) -> Option<&OpenOverlay> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Returns `true` if the overlay is open for `trigger`.
    pub fn is_open_for(&self, trigger: &TriggerId) -> bool {
        self.open.as_ref().is_some_and(|o| &o.trigger == trigger)
    }

    /// Returns `true` if the point lies inside the visible overlay.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.open.as_ref().is_some_and(|o| o.area().contains(x, y))
    }

    /// Shows the overlay for `trigger`, replacing whatever it showed before.
    pub fn show(&mut self, trigger: TriggerId, content: OverlayContent, placement: Placement, size: Size) {
        debug!(
            "{:?} overlay shown for {} at ({}, {})",
            self.kind, trigger, placement.left, placement.top
        );
        self.open = Some(OpenOverlay {
            trigger,
            content,
            placement,
            size,
        });
    }

    /// Hides the overlay. Returns `true` if it was visible.
    pub fn hide(&mut self) -> bool {
        let was_open = self.open.take().is_some();
        if was_open {
            debug!("{:?} overlay hidden", self.kind);
        }
        was_open
    }
}

/// The two overlay instances plus shared placement settings.
#[derive(Debug, Clone)]
pub struct Overlays {
    pub popover: Overlay,
    pub tooltip: Overlay,
    margin: i32,
}

impl Default for Overlays {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

impl Overlays {
    pub fn new(margin: i32) -> Self {
        Self {
            popover: Overlay::new(OverlayKind::Recommendations),
            tooltip: Overlay::new(OverlayKind::HeaderTip),
            margin,
        }
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn get(&self, kind: OverlayKind) -> &Overlay {
        match kind {
            OverlayKind::Recommendations => &self.popover,
            OverlayKind::HeaderTip => &self.tooltip,
        }
    }

    pub fn get_mut(&mut self, kind: OverlayKind) -> &mut Overlay {
        match kind {
            OverlayKind::Recommendations => &mut self.popover,
            OverlayKind::HeaderTip => &mut self.tooltip,
        }
    }

    /// Visible overlays in paint order (tooltip on top).
    pub fn visible(&self) -> impl Iterator<Item = (OverlayKind, &OpenOverlay)> {
        [&self.popover, &self.tooltip]
            .into_iter()
            .filter_map(|o| o.current().map(|open| (o.kind(), open)))
    }

    /// Hides both overlays. Returns `true` if anything was visible.
    pub fn close_all(&mut self) -> bool {
        let popover = self.popover.hide();
        let tooltip = self.tooltip.hide();
        popover || tooltip
    }
}
