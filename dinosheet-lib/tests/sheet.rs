use std::collections::HashMap;
use std::sync::Arc;

use dinosheet_lib::columns::ColumnKey;
use dinosheet_lib::dispatch::{OverlayContent, TriggerId};
use dinosheet_lib::feed::{LoadOutcome, LoadTicket, parse_feed};
use dinosheet_lib::model::RawRecord;
use dinosheet_lib::overlay::{Rect, Size};
use dinosheet_lib::render::RenderContext;
use dinosheet_lib::sort::SortDirection;
use dinosheet_lib::{Host, Settings, Sheet, UiEvent};

const FEED: &str = r#"
dinos:
  - name: Allosaurus
    type: Carnivore
    stats:
      weight_kg: 3000
    mutation_recs: [Cannibalistic, Hunter]
  - name: Beipiaosaurus
    type: Omnivore
    stats:
      weight_kg: null
    mutation_recs: []
  - name: Carnotaurus
    type: Carnivore
    stats:
      weight_kg: 1500
  - name: Dodo
    type: AI
    stats:
      weight_kg: 20
"#;

struct MockHost {
    viewport: Size,
    anchors: HashMap<TriggerId, Rect>,
}

impl MockHost {
    fn new() -> Self {
        Self {
            viewport: Size::new(80, 24),
            anchors: HashMap::new(),
        }
    }

    fn anchor_at(mut self, trigger: TriggerId, rect: Rect) -> Self {
        self.anchors.insert(trigger, rect);
        self
    }
}

impl Host for MockHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn anchor(&self, trigger: &TriggerId) -> Option<Rect> {
        self.anchors.get(trigger).copied()
    }

    fn measure(&self, content: &OverlayContent) -> Size {
        Size::new(20, content.lines().len() as i32 + 2)
    }
}

fn loaded_sheet(settings: &Settings) -> Sheet {
    let records = parse_feed("dinosaurs_evrima.yaml", FEED).unwrap();
    let mut sheet = Sheet::new(settings);
    let ticket = LoadTicket {
        generation: 1,
        name: settings.feed_name(),
    };
    sheet.begin_load(&ticket);
    assert!(sheet.apply_load(LoadOutcome {
        ticket,
        result: Ok(Arc::new(records)),
    }));
    sheet
}

fn names(sheet: &Sheet) -> Vec<String> {
    sheet
        .table()
        .rows()
        .iter()
        .map(|row| row.cells[0].text.clone())
        .collect()
}

fn header_click(key: &str) -> UiEvent {
    UiEvent::HeaderClick { key: key.into() }
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_null_weight_sorts_last_both_ways() {
    let mut sheet = loaded_sheet(&Settings::default());
    let host = MockHost::new();

    let update = sheet.handle(header_click("weight"), &host);
    assert!(update.resorted);
    assert_eq!(sheet.sort_state().direction(), Some(SortDirection::Descending));
    assert_eq!(names(&sheet), ["Allosaurus", "Carnotaurus", "Beipiaosaurus"]);

    sheet.handle(header_click("weight"), &host);
    assert_eq!(sheet.sort_state().direction(), Some(SortDirection::Ascending));
    assert_eq!(names(&sheet), ["Carnotaurus", "Allosaurus", "Beipiaosaurus"]);
}

#[test]
fn test_third_click_restores_source_order() {
    let mut sheet = loaded_sheet(&Settings::default());
    let host = MockHost::new();
    let original = names(&sheet);

    for _ in 0..3 {
        sheet.handle(header_click("name"), &host);
    }
    assert!(sheet.sort_state().is_default());
    assert_eq!(names(&sheet), original);
}

#[test]
fn test_unknown_header_is_ignored() {
    let mut sheet = loaded_sheet(&Settings::default());
    let update = sheet.handle(header_click("colour"), &MockHost::new());
    assert!(!update.resorted);
    assert!(sheet.sort_state().is_default());
}

#[test]
fn test_header_indicators_follow_state() {
    let mut sheet = loaded_sheet(&Settings::default());
    sheet.sort_by(ColumnKey::Weight);
    let indicator = |key| {
        sheet
            .table()
            .header
            .iter()
            .find(|h| h.key == Some(key))
            .map(|h| h.indicator)
    };
    assert_eq!(indicator(ColumnKey::Weight), Some("desc"));
    assert_eq!(indicator(ColumnKey::Name), Some("none"));
}

// ============================================================================
// Filtering and contexts
// ============================================================================

#[test]
fn test_ai_rows_follow_filter() {
    let mut sheet = loaded_sheet(&Settings::default());
    assert_eq!(sheet.table().rows().len(), 3);

    sheet.set_show_ai(true);
    assert_eq!(sheet.table().rows().len(), 4);
    let dodo = &sheet.table().rows()[3];
    assert!(dodo.no_print);
    assert_eq!(dodo.original_index, 3);

    sheet.set_context(RenderContext::Print);
    assert_eq!(sheet.table().rows().len(), 3);
    assert!(sheet.table().rows().iter().all(|row| row.recommendations.is_none()));
}

// ============================================================================
// Overlays
// ============================================================================

#[test]
fn test_popover_toggles_on_trigger() {
    let mut sheet = loaded_sheet(&Settings::default());
    let trigger = TriggerId::recommendations(0);
    let host = MockHost::new().anchor_at(trigger.clone(), Rect::new(70, 3, 4, 1));
    let click = UiEvent::Click {
        x: 71,
        y: 3,
        trigger: Some(trigger.clone()),
    };

    let update = sheet.handle(click.clone(), &host);
    assert!(update.overlays);
    let open = sheet.overlays().popover.current().unwrap();
    assert_eq!(open.trigger, trigger);
    assert_eq!(
        open.content,
        OverlayContent::Recommendations(vec!["Cannibalistic".into(), "Hunter".into()])
    );
    assert_eq!(open.placement.left, 80 - 20 - 8);

    sheet.handle(click, &host);
    assert!(!sheet.overlays().popover.is_open());
}

#[test]
fn test_outside_click_closes_popover() {
    let mut sheet = loaded_sheet(&Settings::default());
    let trigger = TriggerId::recommendations(1);
    let host = MockHost::new().anchor_at(trigger.clone(), Rect::new(40, 2, 4, 1));
    sheet.handle(
        UiEvent::Click {
            x: 40,
            y: 2,
            trigger: Some(trigger),
        },
        &host,
    );
    assert!(sheet.overlays().popover.is_open());

    let inside = sheet.overlays().popover.current().unwrap().area();
    sheet.handle(
        UiEvent::Click {
            x: inside.x,
            y: inside.y,
            trigger: None,
        },
        &host,
    );
    assert!(sheet.overlays().popover.is_open());

    sheet.handle(
        UiEvent::Click {
            x: 0,
            y: 0,
            trigger: None,
        },
        &host,
    );
    assert!(!sheet.overlays().popover.is_open());
}

#[test]
fn test_tooltip_hover_and_dismissal() {
    let mut sheet = loaded_sheet(&Settings::default());
    let tip = TriggerId::header_tip("gt1");
    let host = MockHost::new().anchor_at(tip.clone(), Rect::new(10, 0, 8, 1));

    sheet.handle(UiEvent::PointerEnter(tip.clone()), &host);
    assert!(sheet.overlays().tooltip.is_open_for(&tip));
    sheet.handle(UiEvent::PointerLeave(tip.clone()), &host);
    assert!(!sheet.overlays().tooltip.is_open());

    sheet.handle(UiEvent::Focus(tip.clone()), &host);
    assert!(sheet.overlays().tooltip.is_open());
    sheet.handle(UiEvent::Escape, &host);
    assert!(!sheet.overlays().tooltip.is_open());

    sheet.handle(UiEvent::Focus(tip), &host);
    sheet.handle(UiEvent::Scroll, &host);
    assert!(!sheet.overlays().tooltip.is_open());
}

#[test]
fn test_scroll_and_resize_close_popover() {
    let mut sheet = loaded_sheet(&Settings::default());
    let trigger = TriggerId::recommendations(2);
    let host = MockHost::new().anchor_at(trigger.clone(), Rect::new(40, 5, 4, 1));
    let open = UiEvent::Click {
        x: 40,
        y: 5,
        trigger: Some(trigger),
    };

    sheet.handle(open.clone(), &host);
    assert!(sheet.handle(UiEvent::Scroll, &host).overlays);

    sheet.handle(open, &host);
    assert!(sheet.handle(UiEvent::Resize(Size::new(100, 40)), &host).overlays);
    assert!(!sheet.overlays().popover.is_open());
}

#[test]
fn test_popover_flips_near_bottom() {
    let mut sheet = loaded_sheet(&Settings::default());
    let trigger = TriggerId::recommendations(0);
    let anchor = Rect::new(10, 21, 4, 1);
    let host = MockHost::new().anchor_at(trigger.clone(), anchor);

    sheet.handle(
        UiEvent::Click {
            x: 10,
            y: 21,
            trigger: Some(trigger),
        },
        &host,
    );
    let open = sheet.overlays().popover.current().unwrap();
    assert!(open.placement.top < anchor.top());
}

#[test]
fn test_popover_closes_when_row_filtered_out() {
    let mut sheet = loaded_sheet(&Settings::default());
    sheet.set_show_ai(true);
    let trigger = TriggerId::recommendations(3);
    let host = MockHost::new().anchor_at(trigger.clone(), Rect::new(40, 5, 4, 1));
    sheet.handle(
        UiEvent::Click {
            x: 40,
            y: 5,
            trigger: Some(trigger),
        },
        &host,
    );
    assert!(sheet.overlays().popover.is_open());

    sheet.set_show_ai(false);
    assert!(!sheet.overlays().popover.is_open());
}

#[test]
fn test_empty_feed_renders_no_rows() {
    let mut sheet = Sheet::new(&Settings::default());
    let ticket = LoadTicket {
        generation: 7,
        name: "dinosaurs_evrima.yaml".into(),
    };
    sheet.begin_load(&ticket);
    sheet.apply_load(LoadOutcome {
        ticket,
        result: Ok(Arc::new(Vec::<RawRecord>::new())),
    });
    assert!(sheet.table().rows().is_empty());
    assert!(sheet.table().column_count() > 0);
}
