//! Turns ordered records into table rows.

use crate::columns::{Column, ColumnKey, visible_columns};
use crate::dispatch::{OverlayContent, TriggerId, TriggerRegistry};
use crate::format::{format_category, format_name, format_number, format_pair, format_percent};
use crate::model::{Record, Variant};
use crate::sort::SortState;

/// Label of the recommendation column.
pub const INFO_LABEL: &str = "Tips";

/// Tooltip of the recommendation column header.
pub const INFO_HINT: &str = "Click or tap for details.";

/// Where the table is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderContext {
    /// Interactive view: every visible row plus the recommendation column.
    #[default]
    Screen,
    /// Printable sheet: no `no_print` rows and no recommendation column.
    Print,
}

/// A header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    /// Sort key; `None` for the recommendation column.
    pub key: Option<ColumnKey>,
    pub label: &'static str,
    pub sortable: bool,
    /// `"asc"`, `"desc"` or `"none"`.
    pub indicator: &'static str,
    pub tooltip: Option<TriggerId>,
}

/// A formatted body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub mono: bool,
}

/// A rendered body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub original_index: usize,
    pub cells: Vec<Cell>,
    /// Trigger for the recommendation popover (screen context only).
    pub recommendations: Option<TriggerId>,
    /// Hidden when printing; otherwise a normal row.
    pub no_print: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Loading,
    Rows(Vec<RenderedRow>),
    /// Single row spanning all columns.
    Error(String),
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub header: Vec<HeaderCell>,
    pub body: TableBody,
}

impl Default for RenderedTable {
    fn default() -> Self {
        Self {
            header: Vec::new(),
            body: TableBody::Loading,
        }
    }
}

impl RenderedTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Body rows; empty while loading or after an error.
    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Loading | TableBody::Error(_) => &[],
        }
    }
}

/// Formats one cell of a record.
pub fn format_cell(record: &Record, column: &Column) -> String {
    let raw = record.raw();
    let gt = &raw.growth_thresholds;
    let st = &raw.stats;
    let pk = &raw.pack_size;
    match column.key {
        ColumnKey::Name => format_name(record.name()).to_string(),
        ColumnKey::Type => format_category(raw.category.as_deref()).to_string(),
        ColumnKey::FirstMutation => format_percent(gt.first_mutation.as_ref()),
        ColumnKey::SecondMutation => format_percent(gt.second_mutation.as_ref()),
        ColumnKey::ThirdMutation => format_percent(gt.third_mutation.as_ref()),
        ColumnKey::SanctuaryMushroom => format_percent(gt.sanctuary_mushroom.as_ref()),
        ColumnKey::SanctuaryLockout => format_percent(gt.sanctuary_lockout.as_ref()),
        ColumnKey::Weight => format_number(st.weight_kg.as_ref()),
        ColumnKey::PrimeWeight => format_number(st.weight_prime.as_ref()),
        ColumnKey::Bite => format_number(st.bite_force_n.as_ref()),
        ColumnKey::Speed => format_number(st.speed_kmh.as_ref()),
        ColumnKey::Carry => format_percent(st.carry_weight_perc.as_ref()),
        ColumnKey::Pack => format_pair(pk.base.as_ref(), pk.with_social.as_ref()),
    }
}

/// Renders rows for a variant, filter and context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableRenderer {
    pub variant: Variant,
    pub show_ai: bool,
    pub context: RenderContext,
}

impl TableRenderer {
    pub fn columns(&self) -> Vec<&'static Column> {
        visible_columns(self.variant).collect()
    }

    /// Whether a record gets a row at all.
    pub fn includes(&self, record: &Record) -> bool {
        match self.context {
            RenderContext::Screen => self.show_ai || !record.is_ai(),
            RenderContext::Print => !record.is_ai(),
        }
    }

    fn header(&self, sort: SortState, registry: &mut TriggerRegistry) -> Vec<HeaderCell> {
        let mut header: Vec<HeaderCell> = self
            .columns()
            .into_iter()
            .map(|column| {
                let tooltip = column.description.map(|text| {
                    let id = TriggerId::header_tip(column.key.as_str());
                    registry.register(id.clone(), OverlayContent::Tip(text.to_string()));
                    id
                });
                HeaderCell {
                    key: Some(column.key),
                    label: column.label,
                    sortable: column.sortable,
                    indicator: sort.indicator(column.key),
                    tooltip,
                }
            })
            .collect();

        if self.context == RenderContext::Screen {
            let id = TriggerId::header_tip("info");
            registry.register(id.clone(), OverlayContent::Tip(INFO_HINT.to_string()));
            header.push(HeaderCell {
                key: None,
                label: INFO_LABEL,
                sortable: false,
                indicator: "none",
                tooltip: Some(id),
            });
        }
        header
    }

    /// Renders records that are already in display order.
    ///
    /// The registry is rebuilt to match the rendered triggers.
    pub fn render(
        &self,
        ordered: &[&Record],
        sort: SortState,
        registry: &mut TriggerRegistry,
    ) -> RenderedTable {
        registry.clear();
        let header = self.header(sort, registry);
        let columns = self.columns();

        let rows = ordered
            .iter()
            .filter(|record| self.includes(record))
            .map(|record| {
                let cells = columns
                    .iter()
                    .map(|column| Cell {
                        text: format_cell(record, column),
                        mono: column.is_mono(),
                    })
                    .collect();
                let recommendations = (self.context == RenderContext::Screen).then(|| {
                    let id = TriggerId::recommendations(record.original_index());
                    registry.register(
                        id.clone(),
                        OverlayContent::Recommendations(record.recommendations().to_vec()),
                    );
                    id
                });
                RenderedRow {
                    original_index: record.original_index(),
                    cells,
                    recommendations,
                    no_print: record.is_ai(),
                }
            })
            .collect();

        RenderedTable {
            header,
            body: TableBody::Rows(rows),
        }
    }

    /// Header plus a single error row naming the file that failed.
    pub fn render_error(&self, file: &str, sort: SortState, registry: &mut TriggerRegistry) -> RenderedTable {
        registry.clear();
        RenderedTable {
            header: self.header(sort, registry),
            body: TableBody::Error(format!("Could not load {file}.")),
        }
    }

    pub fn render_loading(&self, sort: SortState, registry: &mut TriggerRegistry) -> RenderedTable {
        registry.clear();
        RenderedTable {
            header: self.header(sort, registry),
            body: TableBody::Loading,
        }
    }
}

/// Renders a table as aligned plain text, one line per row.
///
/// Used for printable output; widths are measured in characters.
pub fn to_plain_text(table: &RenderedTable) -> String {
    let mut lines: Vec<Vec<String>> = vec![table.header.iter().map(|h| h.label.to_string()).collect()];
    match &table.body {
        TableBody::Rows(rows) => {
            lines.extend(rows.iter().map(|row| row.cells.iter().map(|c| c.text.clone()).collect()));
        }
        TableBody::Error(message) => lines.push(vec![message.clone()]),
        TableBody::Loading => {}
    }

    let mut widths = vec![0; table.column_count()];
    for line in &lines {
        if line.len() == widths.len() {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    lines
        .iter()
        .map(|line| {
            line.iter()
                .zip(widths.iter().chain(std::iter::repeat(&0)))
                .map(|(cell, width)| {
                    let pad = width.saturating_sub(cell.chars().count());
                    format!("{cell}{}", " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldValue, PackSize, RawRecord, index_records};
    use crate::sort::SortController;

    fn sample() -> Vec<Record> {
        index_records(vec![
            RawRecord {
                name: Some("Omniraptor".into()),
                category: Some("Carnivore".into()),
                mutation_recs: vec!["Featherweight".into(), "Sustained Hydration".into()],
                ..Default::default()
            },
            RawRecord {
                name: Some("Boar".into()),
                category: Some("AI".into()),
                ..Default::default()
            },
            RawRecord {
                name: Some("Maiasaura".into()),
                category: Some("Herbivore".into()),
                pack_size: PackSize {
                    base: Some(FieldValue::Number(6.0)),
                    with_social: Some(FieldValue::Number(8.0)),
                },
                ..Default::default()
            },
        ])
    }

    fn render(renderer: TableRenderer, records: &[Record], registry: &mut TriggerRegistry) -> RenderedTable {
        let sort = SortController::new();
        renderer.render(&sort.order(records), sort.state(), registry)
    }

    #[test]
    fn test_ai_rows_hidden_by_default() {
        let records = sample();
        let mut registry = TriggerRegistry::new();
        let table = render(TableRenderer::default(), &records, &mut registry);
        let indices: Vec<_> = table.rows().iter().map(|r| r.original_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_ai_rows_shown_but_not_printable() {
        let records = sample();
        let mut registry = TriggerRegistry::new();
        let renderer = TableRenderer {
            show_ai: true,
            ..Default::default()
        };
        let table = render(renderer, &records, &mut registry);
        assert_eq!(table.rows().len(), 3);
        assert!(table.rows()[1].no_print);
        assert!(table.rows()[1].recommendations.is_some());
    }

    #[test]
    fn test_print_context() {
        let records = sample();
        let mut registry = TriggerRegistry::new();
        let renderer = TableRenderer {
            show_ai: true,
            context: RenderContext::Print,
            ..Default::default()
        };
        let table = render(renderer, &records, &mut registry);
        assert_eq!(table.rows().len(), 2);
        assert!(table.header.iter().all(|h| h.key.is_some()));
        assert!(table.rows().iter().all(|r| r.recommendations.is_none()));
    }

    #[test]
    fn test_recommendations_registered_in_order() {
        let records = sample();
        let mut registry = TriggerRegistry::new();
        let table = render(TableRenderer::default(), &records, &mut registry);
        let trigger = table.rows()[0].recommendations.clone().unwrap();
        assert_eq!(
            registry.get(&trigger),
            Some(&OverlayContent::Recommendations(vec![
                "Featherweight".into(),
                "Sustained Hydration".into()
            ]))
        );
    }

    #[test]
    fn test_cells_follow_variant_columns() {
        let records = sample();
        let mut registry = TriggerRegistry::new();
        let renderer = TableRenderer {
            variant: Variant::Hordetest,
            ..Default::default()
        };
        let table = render(renderer, &records, &mut registry);
        // Eight data columns plus the recommendation column.
        assert_eq!(table.column_count(), 9);
        let maiasaura = &table.rows()[1];
        assert_eq!(maiasaura.cells.len(), 8);
        assert_eq!(maiasaura.cells[0].text, "Maiasaura");
        assert_eq!(maiasaura.cells[1].text, "🌿");
        assert_eq!(maiasaura.cells[7].text, "6 / 8");
        assert_eq!(maiasaura.cells[3].text, "—");
    }

    #[test]
    fn test_error_row() {
        let mut registry = TriggerRegistry::new();
        let table = TableRenderer::default().render_error(
            "dinosaurs_evrima.yaml",
            SortState::default(),
            &mut registry,
        );
        assert_eq!(
            table.body,
            TableBody::Error("Could not load dinosaurs_evrima.yaml.".into())
        );
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_plain_text() {
        let records = sample();
        let mut registry = TriggerRegistry::new();
        let renderer = TableRenderer {
            variant: Variant::Hordetest,
            context: RenderContext::Print,
            ..Default::default()
        };
        let text = to_plain_text(&render(renderer, &records, &mut registry));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name        Type"));
        assert!(lines[2].ends_with("6 / 8"));
    }
}
