//! Record schema for dinosaur feeds.

mod record;
mod value;
mod variant;

pub use record::*;
pub use value::*;
pub use variant::*;

pub(crate) use value::lenient;
