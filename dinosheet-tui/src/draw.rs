//! Draws a [`Sheet`] into a [`Buffer`] and records where things landed.
//!
//! The returned [`Frame`] is the terminal's answer to the dispatcher's
//! geometry queries: trigger anchors, viewport size and overlay sizes are all
//! in cells.

use std::collections::HashMap;

use crossterm::style::Color;
use dinosheet_lib::columns::ColumnKey;
use dinosheet_lib::dispatch::{OverlayContent, TriggerId};
use dinosheet_lib::format::PLACEHOLDER;
use dinosheet_lib::overlay::{OpenOverlay, OverlayKind, Rect, Size};
use dinosheet_lib::render::{RenderContext, RenderedTable, TableBody};
use dinosheet_lib::{Host, LoadState, Sheet};

use crate::buffer::{Buffer, Style, display_width, truncate_to_width};

const TITLE_ROW: u16 = 0;
const HEADER_ROW: u16 = 1;
const RULE_ROW: u16 = 2;
const BODY_TOP: u16 = 3;
const LEFT: u16 = 1;
const GAP: usize = 2;

/// Gap around overlays, in cells, unless the settings say otherwise.
pub const OVERLAY_MARGIN: i32 = 1;

/// Text of the recommendation trigger cell.
pub const INFO_CELL: &str = "(i)";

const HELP: &str = "q quit  v variant  a AI  p print  r reload  Tab tips  Enter sort  Esc close";

/// What sits under a screen position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Header {
        key: Option<ColumnKey>,
        tip: Option<TriggerId>,
    },
    Trigger(TriggerId),
    Overlay,
}

/// Hit boxes in paint order; later boxes are on top.
#[derive(Debug, Default)]
pub struct HitMap {
    boxes: Vec<(Rect, Hit)>,
}

impl HitMap {
    pub fn register(&mut self, rect: Rect, hit: Hit) {
        self.boxes.push((rect, hit));
    }

    /// Topmost hit at a position.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<&Hit> {
        self.boxes
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, hit)| hit)
    }
}

/// Scroll and focus state owned by the app.
#[derive(Debug, Clone, Default)]
pub struct View {
    pub scroll: usize,
    /// Header tooltip trigger with keyboard focus.
    pub focus: Option<TriggerId>,
}

/// Geometry of the last drawn frame.
#[derive(Debug, Default)]
pub struct Frame {
    viewport: Size,
    anchors: HashMap<TriggerId, Rect>,
    hits: HitMap,
    body_height: usize,
}

impl Frame {
    pub fn hit(&self, x: u16, y: u16) -> Option<&Hit> {
        self.hits.hit_test(x as i32, y as i32)
    }

    /// Number of body rows that fit on screen.
    pub fn body_height(&self) -> usize {
        self.body_height
    }
}

impl Host for Frame {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn anchor(&self, trigger: &TriggerId) -> Option<Rect> {
        self.anchors.get(trigger).copied()
    }

    fn measure(&self, content: &OverlayContent) -> Size {
        measure(content, self.viewport)
    }
}

/// Overlay size: the widest line plus border and padding, at most the
/// viewport width.
pub fn measure(content: &OverlayContent, viewport: Size) -> Size {
    let lines = content.lines();
    let inner = lines.iter().map(|l| display_width(l)).max().unwrap_or(0).max(1);
    let width = (inner as i32 + 4).min(viewport.width.max(4));
    let height = lines.len().max(1) as i32 + 2;
    Size::new(width, height)
}

/// Column widths wide enough for every header and cell.
pub fn column_widths(table: &RenderedTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .header
        .iter()
        .map(|h| match h.key {
            Some(_) => display_width(h.label) + 2,
            None => display_width(h.label).max(INFO_CELL.len()),
        })
        .collect();
    for row in table.rows() {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(display_width(&cell.text));
        }
    }
    widths
}

fn arrow(indicator: &str) -> &'static str {
    match indicator {
        "desc" => " ▼",
        "asc" => " ▲",
        _ => "",
    }
}

fn cell_rect(x: u16, y: u16, width: usize) -> Rect {
    Rect::new(x as i32, y as i32, width as i32, 1)
}

fn title(sheet: &Sheet) -> String {
    let status = match sheet.load_state() {
        LoadState::Idle => String::new(),
        LoadState::Loading { name } => format!("loading {name}…"),
        LoadState::Ready { name } => format!("{name}, {} rows", sheet.table().rows().len()),
        LoadState::Failed { name } => format!("{name} failed"),
    };
    let context = match sheet.context() {
        RenderContext::Screen => "screen",
        RenderContext::Print => "print preview",
    };
    let ai = if sheet.show_ai() { "AI shown" } else { "AI hidden" };
    format!("dinosheet  {}  {}  {}  {}", sheet.variant(), ai, context, status)
}

/// Draws the whole screen.
pub fn draw(buf: &mut Buffer, sheet: &Sheet, view: &View) -> Frame {
    let mut frame = Frame {
        viewport: Size::new(buf.width() as i32, buf.height() as i32),
        body_height: buf.height().saturating_sub(BODY_TOP + 1) as usize,
        ..Frame::default()
    };
    let full = buf.width() as usize;
    let table = sheet.table();
    let widths = column_widths(table);

    buf.put_str(LEFT, TITLE_ROW, &title(sheet), full, Style::default().bold().fg(Color::Green));

    let mut x = LEFT;
    for (header, &width) in table.header.iter().zip(&widths) {
        let label = format!("{}{}", header.label, arrow(header.indicator));
        let mut style = Style::default();
        if header.sortable {
            style = style.bold();
        }
        if header.tooltip.is_some() && header.tooltip == view.focus {
            style = style.reverse();
        }
        buf.put_str(x, HEADER_ROW, &label, width, style);

        let rect = cell_rect(x, HEADER_ROW, width);
        if let Some(tip) = &header.tooltip {
            frame.anchors.insert(tip.clone(), rect);
        }
        frame.hits.register(
            rect,
            Hit::Header {
                key: header.key,
                tip: header.tooltip.clone(),
            },
        );
        x = x.saturating_add((width + GAP) as u16);
    }

    let rule = "─".repeat(full.saturating_sub(2));
    buf.put_str(LEFT, RULE_ROW, &rule, full, Style::default().dim());

    match &table.body {
        TableBody::Loading => {
            buf.put_str(LEFT, BODY_TOP, "Loading…", full, Style::default().dim());
        }
        TableBody::Error(message) => {
            buf.put_str(LEFT, BODY_TOP, message, full, Style::default().fg(Color::Red));
        }
        TableBody::Rows(rows) => {
            let popover = sheet.overlays().popover.current().map(|open| &open.trigger);
            for (i, row) in rows.iter().skip(view.scroll).take(frame.body_height).enumerate() {
                let y = BODY_TOP + i as u16;
                let style = if row.no_print {
                    Style::default().dim()
                } else {
                    Style::default()
                };

                let mut x = LEFT;
                for (cell, &width) in row.cells.iter().zip(&widths) {
                    let pad = if cell.mono {
                        width.saturating_sub(display_width(&cell.text))
                    } else {
                        0
                    };
                    buf.put_str(x + pad as u16, y, &cell.text, width - pad, style);
                    x = x.saturating_add((width + GAP) as u16);
                }

                if let Some(trigger) = &row.recommendations {
                    let info_style = if popover == Some(trigger) {
                        style.reverse()
                    } else {
                        style.fg(Color::Cyan)
                    };
                    buf.put_str(x, y, INFO_CELL, INFO_CELL.len(), info_style);
                    let rect = cell_rect(x, y, INFO_CELL.len());
                    frame.anchors.insert(trigger.clone(), rect);
                    frame.hits.register(rect, Hit::Trigger(trigger.clone()));
                }
            }
        }
    }

    if let Some(status_row) = buf.height().checked_sub(1).filter(|&row| row > BODY_TOP) {
        buf.put_str(LEFT, status_row, HELP, full, Style::default().dim());
    }

    for (kind, open) in sheet.overlays().visible() {
        draw_overlay(buf, kind, open);
        frame.hits.register(open.area(), Hit::Overlay);
    }

    frame
}

fn draw_overlay(buf: &mut Buffer, kind: OverlayKind, open: &OpenOverlay) {
    let left = open.placement.left.max(0) as u16;
    let top = open.placement.top.max(0) as u16;
    let width = open.size.width.max(2) as u16;
    let height = open.size.height.max(2) as u16;
    let border = match kind {
        OverlayKind::Recommendations => Style::default().fg(Color::Yellow),
        OverlayKind::HeaderTip => Style::default().fg(Color::Cyan),
    };

    buf.fill(left, top, width, height, Style::default());
    let inner = width.saturating_sub(2) as usize;
    let edge = "─".repeat(inner);
    buf.put_str(left, top, &format!("┌{edge}┐"), width as usize, border);
    buf.put_str(left, top + height - 1, &format!("└{edge}┘"), width as usize, border);
    for row in top + 1..top + height - 1 {
        buf.put_str(left, row, "│", 1, border);
        buf.put_str(left + width - 1, row, "│", 1, border);
    }

    let text = width.saturating_sub(4) as usize;
    let lines = open.content.lines();
    if lines.is_empty() {
        buf.put_str(left + 2, top + 1, PLACEHOLDER, text, Style::default().dim());
    }
    for (i, line) in lines.iter().enumerate() {
        let line = truncate_to_width(line, text);
        buf.put_str(left + 2, top + 1 + i as u16, &line, text, Style::default());
    }
}
