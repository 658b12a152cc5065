//! The viewer session: loaded records, sort state, filter and overlays.
//!
//! A [`Sheet`] owns everything a host needs to show one table. The host feeds
//! it load outcomes and input events and draws whatever [`Sheet::table`]
//! returns.

use log::{debug, error, info};

use crate::columns::ColumnKey;
use crate::config::Settings;
use crate::dispatch::{Dispatcher, Host, UiEvent, Update};
use crate::feed::{LoadOutcome, LoadTicket};
use crate::model::{Record, Variant, index_records};
use crate::overlay::Overlays;
use crate::render::{RenderContext, RenderedTable, TableRenderer};
use crate::sort::{SortController, SortState};

/// Progress of the current feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading { name: String },
    Ready { name: String },
    Failed { name: String },
}

#[derive(Debug)]
pub struct Sheet {
    renderer: TableRenderer,
    state: LoadState,
    pending: Option<u64>,
    records: Vec<Record>,
    sort: SortController,
    dispatcher: Dispatcher,
    table: RenderedTable,
}

impl Sheet {
    pub fn new(settings: &Settings) -> Self {
        let mut sheet = Self {
            renderer: TableRenderer {
                variant: settings.variant,
                show_ai: settings.show_ai,
                context: RenderContext::Screen,
            },
            state: LoadState::Idle,
            pending: None,
            records: Vec::new(),
            sort: SortController::new(),
            dispatcher: Dispatcher::new(settings.margin()),
            table: RenderedTable::default(),
        };
        sheet.rerender();
        sheet
    }

    pub fn variant(&self) -> Variant {
        self.renderer.variant
    }

    pub fn show_ai(&self) -> bool {
        self.renderer.show_ai
    }

    pub fn context(&self) -> RenderContext {
        self.renderer.context
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Switches the column set. The caller is expected to start a load for
    /// the new variant's feed.
    pub fn set_variant(&mut self, variant: Variant) {
        if self.renderer.variant != variant {
            info!("Switching variant to {}", variant);
            self.renderer.variant = variant;
            self.rerender();
        }
    }

    pub fn set_show_ai(&mut self, show_ai: bool) {
        if self.renderer.show_ai != show_ai {
            debug!("AI rows {}", if show_ai { "shown" } else { "hidden" });
            self.renderer.show_ai = show_ai;
            self.rerender();
        }
    }

    pub fn set_context(&mut self, context: RenderContext) {
        if self.renderer.context != context {
            debug!("Render context {:?}", context);
            self.renderer.context = context;
            self.rerender();
        }
    }

    /// Marks `ticket` as the only load whose outcome will be accepted.
    pub fn begin_load(&mut self, ticket: &LoadTicket) {
        debug!("Loading {} (generation {})", ticket.name, ticket.generation);
        self.pending = Some(ticket.generation);
        self.state = LoadState::Loading {
            name: ticket.name.clone(),
        };
        self.dispatcher.close_all();
        self.rerender();
    }

    /// Applies a finished load. Returns `false` if the outcome was stale and
    /// got discarded.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> bool {
        let LoadOutcome { ticket, result } = outcome;
        if self.pending != Some(ticket.generation) {
            debug!(
                "Discarding stale load of {} (generation {})",
                ticket.name, ticket.generation
            );
            return false;
        }
        self.pending = None;

        match result {
            Ok(raws) => {
                self.records = index_records(raws.iter().cloned());
                self.state = LoadState::Ready { name: ticket.name };
            }
            Err(e) => {
                error!("Could not load {}: {}", ticket.name, e);
                self.records.clear();
                self.state = LoadState::Failed { name: ticket.name };
            }
        }
        self.rerender();
        true
    }

    /// Clicks a column header programmatically.
    pub fn sort_by(&mut self, key: ColumnKey) -> SortState {
        let state = self.sort.click(key);
        self.dispatcher.overlays_mut().popover.hide();
        self.rerender();
        state
    }

    /// Routes a host event. Rows are rendered again when the sort changed.
    pub fn handle(&mut self, event: UiEvent, host: &dyn Host) -> Update {
        let mut update = self.dispatcher.dispatch(event, &mut self.sort, host);
        if update.resorted {
            update.overlays |= self.rerender();
        }
        update
    }

    /// Closes both overlays. Returns `true` if anything was visible.
    pub fn close_overlays(&mut self) -> bool {
        self.dispatcher.close_all()
    }

    pub fn table(&self) -> &RenderedTable {
        &self.table
    }

    pub fn overlays(&self) -> &Overlays {
        self.dispatcher.overlays()
    }

    /// Loaded records in source order, before filtering.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn sort_state(&self) -> SortState {
        self.sort.state()
    }

    /// Rebuilds the table and drops overlays whose trigger vanished. Returns
    /// `true` if an overlay closed.
    fn rerender(&mut self) -> bool {
        let sort = self.sort.state();
        let registry = self.dispatcher.registry_mut();
        self.table = match &self.state {
            LoadState::Ready { .. } => {
                let ordered = self.sort.order(&self.records);
                self.renderer.render(&ordered, sort, registry)
            }
            LoadState::Failed { name } => self.renderer.render_error(name, sort, registry),
            LoadState::Idle | LoadState::Loading { .. } => self.renderer.render_loading(sort, registry),
        };
        self.dispatcher.prune()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::FeedError;
    use crate::model::RawRecord;
    use crate::render::TableBody;

    fn named(name: &str) -> RawRecord {
        RawRecord {
            name: Some(name.to_string()),
            ..RawRecord::default()
        }
    }

    fn outcome(generation: u64, records: Vec<RawRecord>) -> LoadOutcome {
        LoadOutcome {
            ticket: LoadTicket {
                generation,
                name: "dinosaurs_evrima.yaml".into(),
            },
            result: Ok(Arc::new(records)),
        }
    }

    #[test]
    fn test_starts_loading() {
        let sheet = Sheet::new(&Settings::default());
        assert_eq!(sheet.table().body, TableBody::Loading);
        assert_eq!(sheet.load_state(), &LoadState::Idle);
    }

    #[test]
    fn test_stale_outcome_discarded() {
        let mut sheet = Sheet::new(&Settings::default());
        let first = outcome(1, vec![named("Carnotaurus")]);
        let second = outcome(2, vec![named("Dryosaurus"), named("Gallimimus")]);

        sheet.begin_load(&first.ticket);
        sheet.begin_load(&second.ticket);

        assert!(!sheet.apply_load(first));
        assert!(sheet.records().is_empty());
        assert!(sheet.apply_load(second));
        assert_eq!(sheet.records().len(), 2);
        assert_eq!(sheet.table().rows().len(), 2);
    }

    #[test]
    fn test_failed_load_renders_error_row() {
        let mut sheet = Sheet::new(&Settings::default());
        let ticket = LoadTicket {
            generation: 1,
            name: "dinosaurs_evrima.yaml".into(),
        };
        sheet.begin_load(&ticket);
        sheet.apply_load(LoadOutcome {
            ticket,
            result: Err(FeedError::UnsupportedFormat("x".into())),
        });
        assert_eq!(
            sheet.table().body,
            TableBody::Error("Could not load dinosaurs_evrima.yaml.".into())
        );
        assert!(matches!(sheet.load_state(), LoadState::Failed { .. }));
    }

    #[test]
    fn test_sort_by_reorders() {
        let mut sheet = Sheet::new(&Settings::default());
        let loaded = outcome(1, vec![named("b"), named("c"), named("a")]);
        sheet.begin_load(&loaded.ticket);
        sheet.apply_load(loaded);

        sheet.sort_by(ColumnKey::Name);
        let names: Vec<_> = sheet
            .table()
            .rows()
            .iter()
            .map(|row| row.cells[0].text.as_str())
            .collect();
        assert_eq!(names, ["c", "b", "a"]);
    }
}
