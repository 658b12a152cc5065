//! Event loop tying the terminal to a [`Sheet`].

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::EventStream;
use dinosheet_lib::dispatch::TriggerId;
use dinosheet_lib::feed::{FeedLoader, FileSource, LoadOutcome};
use dinosheet_lib::overlay::Size;
use dinosheet_lib::render::RenderContext;
use dinosheet_lib::{Settings, Sheet, UiEvent};
use futures::StreamExt;
use log::{debug, error, info};
use tokio::sync::mpsc;

use crate::draw::{self, Frame, Hit, View};
use crate::input::{self, Action};
use crate::terminal::Terminal;

pub struct App {
    sheet: Sheet,
    /// Settings as read from disk; only session toggles are written back.
    stored: Settings,
    settings_path: Option<PathBuf>,
    loader: Arc<FeedLoader>,
    loads: mpsc::UnboundedSender<LoadOutcome>,
    frame: Frame,
    view: View,
    hovered: Option<TriggerId>,
    /// Settings changed since startup.
    dirty: bool,
    should_quit: bool,
}

impl App {
    /// `effective` drives the session; `stored` is what gets saved on exit.
    pub fn new(
        effective: &Settings,
        stored: Settings,
        settings_path: Option<PathBuf>,
    ) -> (Self, mpsc::UnboundedReceiver<LoadOutcome>) {
        let (loads, rx) = mpsc::unbounded_channel();
        let app = Self {
            sheet: Sheet::new(effective),
            loader: Arc::new(FeedLoader::new(FileSource::new(&effective.data_dir))),
            stored,
            settings_path,
            loads,
            frame: Frame::default(),
            view: View::default(),
            hovered: None,
            dirty: false,
            should_quit: false,
        };
        (app, rx)
    }

    /// Starts loading the current variant's feed in the background.
    fn start_load(&mut self) {
        let ticket = self.loader.begin(self.sheet.variant().file_name());
        self.sheet.begin_load(&ticket);
        self.view.scroll = 0;

        let loader = Arc::clone(&self.loader);
        let loads = self.loads.clone();
        tokio::spawn(async move {
            let outcome = loader.load(ticket).await;
            if loads.send(outcome).is_err() {
                debug!("Load finished after shutdown");
            }
        });
    }

    pub async fn run(
        mut self,
        term: &mut Terminal,
        mut loads: mpsc::UnboundedReceiver<LoadOutcome>,
    ) -> io::Result<()> {
        let mut events = EventStream::new();
        self.start_load();
        self.render(term)?;

        while !self.should_quit {
            tokio::select! {
                Some(event) = events.next() => {
                    let event = event?;
                    if let Some(action) = input::action(&event) {
                        self.on_action(action);
                    }
                }
                Some(outcome) = loads.recv() => {
                    if self.sheet.apply_load(outcome) {
                        self.clamp_scroll();
                    }
                }
                else => break,
            }
            self.render(term)?;
        }

        self.save_settings().await;
        Ok(())
    }

    fn render(&mut self, term: &mut Terminal) -> io::Result<()> {
        let buf = term.frame()?;
        self.frame = draw::draw(buf, &self.sheet, &self.view);
        term.flush()
    }

    fn on_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleVariant => {
                let variant = self.sheet.variant().toggled();
                self.sheet.set_variant(variant);
                self.stored.variant = variant;
                self.dirty = true;
                self.start_load();
            }
            Action::ToggleAi => {
                let show_ai = !self.sheet.show_ai();
                self.sheet.set_show_ai(show_ai);
                self.stored.show_ai = show_ai;
                self.dirty = true;
                self.clamp_scroll();
            }
            Action::TogglePrint => {
                let context = match self.sheet.context() {
                    RenderContext::Screen => RenderContext::Print,
                    RenderContext::Print => RenderContext::Screen,
                };
                self.sheet.set_context(context);
                self.clamp_scroll();
            }
            Action::Reload => {
                let name = self.sheet.variant().file_name();
                info!("Reloading {}", name);
                self.loader.invalidate(&name);
                self.start_load();
            }
            Action::FocusNext => self.move_focus(1),
            Action::FocusPrev => self.move_focus(-1),
            Action::Activate => self.activate(),
            Action::Escape => {
                self.send(UiEvent::Escape);
            }
            Action::Scroll(delta) => {
                self.send(UiEvent::Scroll);
                self.scroll_by(delta);
            }
            Action::Click { x, y } => self.click(x, y),
            Action::Move { x, y } => self.hover(x, y),
            Action::Resize { width, height } => {
                self.send(UiEvent::Resize(Size::new(width as i32, height as i32)));
            }
        }
    }

    fn send(&mut self, event: UiEvent) {
        let update = self.sheet.handle(event, &self.frame);
        if !update.is_empty() {
            debug!("Update: {:?}", update);
        }
    }

    fn click(&mut self, x: u16, y: u16) {
        let event = match self.frame.hit(x, y) {
            Some(Hit::Header { key: Some(key), .. }) => UiEvent::HeaderClick {
                key: key.as_str().to_string(),
            },
            Some(Hit::Trigger(trigger)) => UiEvent::Click {
                x: x as i32,
                y: y as i32,
                trigger: Some(trigger.clone()),
            },
            _ => UiEvent::Click {
                x: x as i32,
                y: y as i32,
                trigger: None,
            },
        };
        self.send(event);
    }

    /// Emits enter/leave as the pointer crosses header tooltip triggers.
    fn hover(&mut self, x: u16, y: u16) {
        let under = match self.frame.hit(x, y) {
            Some(Hit::Header { tip, .. }) => tip.clone(),
            _ => None,
        };
        if under == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.send(UiEvent::PointerLeave(previous));
        }
        if let Some(trigger) = under {
            self.hovered = Some(trigger.clone());
            self.send(UiEvent::PointerEnter(trigger));
        }
    }

    /// Moves keyboard focus across headers that carry a tooltip.
    fn move_focus(&mut self, step: isize) {
        let tips: Vec<TriggerId> = self
            .sheet
            .table()
            .header
            .iter()
            .filter_map(|h| h.tooltip.clone())
            .collect();
        if tips.is_empty() {
            return;
        }

        let next = match self.view.focus.as_ref().and_then(|f| tips.iter().position(|t| t == f)) {
            Some(i) => (i as isize + step).rem_euclid(tips.len() as isize) as usize,
            None if step > 0 => 0,
            None => tips.len() - 1,
        };
        if let Some(previous) = self.view.focus.take() {
            self.send(UiEvent::Blur(previous));
        }
        let trigger = tips[next].clone();
        self.view.focus = Some(trigger.clone());
        self.send(UiEvent::Focus(trigger));
    }

    /// Enter on a focused header sorts by it.
    fn activate(&mut self) {
        let Some(focus) = self.view.focus.clone() else { return };
        let key = self
            .sheet
            .table()
            .header
            .iter()
            .find(|h| h.tooltip.as_ref() == Some(&focus))
            .and_then(|h| h.key);
        match key {
            Some(key) => self.send(UiEvent::HeaderClick {
                key: key.as_str().to_string(),
            }),
            None => debug!("Focused header {} is not sortable", focus),
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let scroll = self.view.scroll as i64 + delta as i64;
        self.view.scroll = scroll.max(0) as usize;
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let rows = self.sheet.table().rows().len();
        let max = rows.saturating_sub(self.frame.body_height().max(1));
        self.view.scroll = self.view.scroll.min(max);
    }

    async fn save_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if !self.dirty {
            return;
        }
        if let Err(e) = self.stored.save(path).await {
            error!("Could not save settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_saves_toggles_without_overrides() {
        let dir = std::env::temp_dir().join(format!("dinosheet-app-{}", std::process::id()));
        let path = dir.join("settings.json");
        let stored = Settings::default();
        let effective = Settings {
            data_dir: PathBuf::from("/srv/feeds"),
            overlay_margin: Some(draw::OVERLAY_MARGIN),
            ..stored.clone()
        };

        let (mut app, _loads) = App::new(&effective, stored, Some(path.clone()));
        app.on_action(Action::ToggleAi);
        app.save_settings().await;

        let saved = Settings::load(&path).await.unwrap();
        assert!(saved.show_ai);
        assert_eq!(saved.data_dir, PathBuf::from("data"));
        assert_eq!(saved.overlay_margin, None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_untouched_session_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("dinosheet-app-idle-{}", std::process::id()));
        let path = dir.join("settings.json");
        let effective = Settings {
            show_ai: true,
            ..Settings::default()
        };

        let (app, _loads) = App::new(&effective, Settings::default(), Some(path.clone()));
        app.save_settings().await;

        assert!(!path.exists());
    }
}
