//! Rendering module for laying document trees out as plain text.

pub mod classify;
mod collector;
mod formatter;
mod language;
mod normalize;
mod options;
pub(crate) mod scripts;
mod sink;
mod text;
pub mod visitor;

pub use collector::Collector;
pub use formatter::Formatter;
pub use language::{default_direction, Direction, POP_DIRECTIONAL_ISOLATE};
pub use normalize::{collapse_whitespace, is_breaking_space, TextNormalizer};
pub use options::{RenderOptions, MIN_USABLE_COLUMNS};
pub use sink::TextSink;
pub use text::to_text;
pub use visitor::Visitor;
