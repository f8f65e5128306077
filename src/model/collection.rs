//! Collection manifest and site metadata.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An ordered collection of chapters and articles to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection title
    #[serde(default)]
    pub title: String,

    /// Optional subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Optional summary paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Collection language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Top-level items, in rendering order
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Collection {
    /// Create an empty collection with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Parse a collection manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a top-level item.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Check if any top-level item is a chapter.
    pub fn has_chapters(&self) -> bool {
        self.items.iter().any(Item::is_chapter)
    }

    /// Check if the collection holds exactly one article and nothing else.
    pub fn is_single_item(&self) -> bool {
        matches!(self.items.as_slice(), [Item::Article { .. }])
    }

    /// All articles, depth first.
    pub fn articles(&self) -> Vec<&Item> {
        fn walk<'a>(items: &'a [Item], out: &mut Vec<&'a Item>) {
            for item in items {
                match item {
                    Item::Chapter { items, .. } => walk(items, out),
                    Item::Article { .. } => out.push(item),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.items, &mut out);
        out
    }
}

/// A collection item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    /// A titled group of nested items
    Chapter {
        /// Chapter title
        title: String,
        /// Nested items
        #[serde(default)]
        items: Vec<Item>,
    },

    /// A single article revision
    Article {
        /// Article title
        title: String,
        /// Revision id
        revision: u64,
        /// Owning wiki key
        #[serde(default)]
        wiki: usize,
    },
}

impl Item {
    /// Create an article item.
    pub fn article(title: impl Into<String>, wiki: usize, revision: u64) -> Self {
        Item::Article {
            title: title.into(),
            revision,
            wiki,
        }
    }

    /// Create a chapter item.
    pub fn chapter(title: impl Into<String>, items: Vec<Item>) -> Self {
        Item::Chapter {
            title: title.into(),
            items,
        }
    }

    /// Check if this is a chapter.
    pub fn is_chapter(&self) -> bool {
        matches!(self, Item::Chapter { .. })
    }

    /// Get the item title.
    pub fn title(&self) -> &str {
        match self {
            Item::Chapter { title, .. } | Item::Article { title, .. } => title,
        }
    }
}

/// Site metadata for a wiki.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Content language of the wiki
    pub lang: String,
}

#[derive(Deserialize)]
struct SiteInfoRecord {
    general: SiteInfo,
}

impl SiteInfo {
    /// Create site metadata with a language.
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    /// Parse a siteinfo record (`{"general": {"lang": ...}}`).
    pub fn from_json(json: &str) -> Result<Self> {
        let record: SiteInfoRecord = serde_json::from_str(json)?;
        Ok(record.general)
    }

    pub(crate) fn from_value(value: serde_json::Value) -> Result<Self> {
        let record: SiteInfoRecord = serde_json::from_value(value)?;
        Ok(record.general)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "type": "collection",
        "title": "Physics",
        "subtitle": "Selected articles",
        "items": [
            {"type": "chapter", "title": "Mechanics", "items": [
                {"type": "article", "title": "Force", "revision": 10, "wiki": 0},
                {"type": "article", "title": "Mass", "revision": 11, "wiki": 0}
            ]},
            {"type": "article", "title": "Heat", "revision": 12, "wiki": 1}
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let collection = Collection::from_json(MANIFEST).unwrap();
        assert_eq!(collection.title, "Physics");
        assert_eq!(collection.subtitle.as_deref(), Some("Selected articles"));
        assert!(collection.summary.is_none());
        assert!(collection.has_chapters());
        assert!(!collection.is_single_item());

        let titles: Vec<_> = collection.articles().iter().map(|a| a.title()).collect();
        assert_eq!(titles, vec!["Force", "Mass", "Heat"]);
    }

    #[test]
    fn test_single_item() {
        let collection = Collection::new("Water").with_item(Item::article("Water", 0, 1));
        assert!(collection.is_single_item());
        assert!(!collection.has_chapters());
    }

    #[test]
    fn test_malformed_manifest() {
        assert!(Collection::from_json(r#"{"items": [{"type": "video"}]}"#).is_err());
    }

    #[test]
    fn test_site_info_record() {
        let site = SiteInfo::from_json(r#"{"general": {"lang": "he", "sitename": "x"}}"#).unwrap();
        assert_eq!(site, SiteInfo::new("he"));
        assert!(SiteInfo::from_json(r#"{"lang": "he"}"#).is_err());
    }
}
