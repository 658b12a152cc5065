//! Dinosaur cheat sheet core
//!
//! Loads dinosaur feeds, formats their values, sorts rows with a tri-state
//! header cycle and positions floating overlays. Everything here is
//! host-agnostic: a front end drives a [`Sheet`] with load outcomes and
//! [`UiEvent`]s and draws the [`RenderedTable`] it gets back.

pub mod accessor;
pub mod columns;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod feed;
pub mod format;
pub mod model;
pub mod overlay;
pub mod render;
pub mod sort;

mod sheet;

pub use config::Settings;
pub use dispatch::{Host, UiEvent, Update};
pub use render::RenderedTable;
pub use sheet::*;
