//! Document model types.
//!
//! A thin read-only view over parsed article HTML plus the collection
//! manifest that orders articles into chapters.

mod collection;
mod document;
mod node;
mod selector;

pub use collection::{Collection, Item, SiteInfo};
pub use document::Document;
pub use node::{Node, NodeKind};
pub use selector::Selector;
