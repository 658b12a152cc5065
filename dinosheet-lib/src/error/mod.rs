//! Error types

mod config;
mod feed;

pub use config::*;
pub use feed::*;
