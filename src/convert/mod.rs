//! Collection conversion driver.
//!
//! Walks a [`Collection`] in order, fetching each article from an
//! [`ArticleStore`] and rendering it through one shared [`Visitor`] and
//! [`Formatter`]. Output is flushed after every top-level item.
//!
//! # Example
//!
//! ```
//! use unwiki::convert::{convert, MemoryStore};
//! use unwiki::model::{Collection, Item, SiteInfo};
//! use unwiki::RenderOptions;
//!
//! fn main() -> unwiki::Result<()> {
//!     let collection = Collection::new("My Book").with_item(Item::article("Rust", 0, 42));
//!     let store = MemoryStore::new()
//!         .with_site(0, SiteInfo::new("en"))
//!         .with_article(0, 42, "<p>A language empowering everyone.</p>");
//!
//!     let mut out = Vec::new();
//!     convert(&collection, &store, &RenderOptions::default(), &mut out)?;
//!     assert_eq!(
//!         String::from_utf8(out).unwrap(),
//!         "My Book\n\nA language empowering everyone.\n\n"
//!     );
//!     Ok(())
//! }
//! ```

mod store;

pub use store::{ArticleStore, DirectoryStore, MemoryStore};

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Collection, Item};
use crate::parser::parse_html;
use crate::render::{collapse_whitespace, Formatter, RenderOptions, TextSink, Visitor};

/// Summary of a finished conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertStats {
    /// Chapters rendered
    pub chapters: usize,
    /// Articles rendered
    pub articles: usize,
    /// Languages used by site defaults or inline switches, sorted
    pub languages: Vec<String>,
    /// Unknown TeX macros encountered, sorted
    pub unknown_macros: Vec<String>,
}

struct Converter<'a, W: Write> {
    store: &'a dyn ArticleStore,
    visitor: Visitor,
    out: Formatter<W>,
    stats: ConvertStats,
}

/// Render a collection to `writer`.
///
/// `has_chapters` and `single_item` are derived from the collection and
/// override whatever `options` carries. Any lookup or write failure aborts
/// the conversion.
pub fn convert<W: Write>(
    collection: &Collection,
    store: &dyn ArticleStore,
    options: &RenderOptions,
    writer: W,
) -> Result<ConvertStats> {
    options.validate()?;
    let options = options
        .clone()
        .with_chapters(collection.has_chapters())
        .with_single_item(collection.is_single_item());

    let mut visitor = Visitor::new(&options);
    if let Some(lang) = &collection.lang {
        visitor.set_language(lang);
    }
    let mut converter = Converter {
        store,
        visitor,
        out: Formatter::new(writer, &options),
        stats: ConvertStats::default(),
    };

    converter.front_matter(collection)?;
    for item in &collection.items {
        converter.item(item)?;
        converter.out.flush()?;
    }
    converter.out.paragraph_break()?;
    converter.out.flush()?;

    let mut stats = converter.stats;
    stats.languages = converter.visitor.used_languages().iter().cloned().collect();
    stats.unknown_macros = converter
        .visitor
        .tex()
        .unknown_macros()
        .map(String::from)
        .collect();
    log::debug!(
        "Converted {} articles in {} chapters",
        stats.articles,
        stats.chapters
    );
    Ok(stats)
}

/// Render an extracted bundle directory to `writer`.
pub fn convert_directory<W: Write>(
    root: impl AsRef<Path>,
    options: &RenderOptions,
    writer: W,
) -> Result<ConvertStats> {
    let store = DirectoryStore::open(root)?;
    let collection = store.collection()?;
    convert(&collection, &store, options, writer)
}

impl<W: Write> Converter<'_, W> {
    fn paragraph(&mut self, text: &str) -> Result<()> {
        self.out.paragraph_break()?;
        self.out.write(&collapse_whitespace(text))?;
        self.out.paragraph_break()
    }

    fn front_matter(&mut self, collection: &Collection) -> Result<()> {
        self.paragraph(&collection.title)?;
        if let Some(subtitle) = &collection.subtitle {
            self.paragraph(subtitle)?;
        }
        if let Some(summary) = &collection.summary {
            self.paragraph(summary)?;
        }
        self.out.flush()
    }

    fn item(&mut self, item: &Item) -> Result<()> {
        match item {
            Item::Chapter { title, items } => {
                log::debug!("Chapter: {}", title);
                self.stats.chapters += 1;
                self.paragraph(title)?;
                for item in items {
                    self.item(item)?;
                }
                Ok(())
            }
            Item::Article {
                title,
                revision,
                wiki,
            } => self.article(title, *wiki, *revision),
        }
    }

    fn article(&mut self, title: &str, wiki: usize, revision: u64) -> Result<()> {
        log::debug!("Article: {} (wiki {}, revision {})", title, wiki, revision);

        let site = self.store.site_info(wiki)?;
        self.visitor.set_language(&site.lang);
        let html = self.store.article_html(wiki, revision)?;
        let doc = parse_html(&html);

        let heading = doc.create_text_element("h1", title);
        self.visitor.visit(&heading, &mut self.out)?;
        self.visitor.visit(&doc.body(), &mut self.out)?;

        self.stats.articles += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::SiteInfo;

    fn render(collection: &Collection, store: &MemoryStore) -> Result<(String, ConvertStats)> {
        let mut out = Vec::new();
        let stats = convert(collection, store, &RenderOptions::default(), &mut out)?;
        Ok((String::from_utf8(out).unwrap(), stats))
    }

    #[test]
    fn test_single_item_collection() {
        let collection = Collection::new("Title").with_item(Item::article("Title", 0, 1));
        let store = MemoryStore::new()
            .with_site(0, SiteInfo::new("en"))
            .with_article(0, 1, "<p>paragraph</p>");
        let (out, stats) = render(&collection, &store).unwrap();
        assert_eq!(out, "Title\n\nparagraph\n\n");
        assert_eq!(stats.articles, 1);
        assert_eq!(stats.languages, vec!["en"]);
    }

    #[test]
    fn test_front_matter_and_multiple_articles() {
        let collection = Collection::new("Book")
            .with_subtitle("A subtitle")
            .with_summary("Summary text.")
            .with_item(Item::article("First", 0, 1))
            .with_item(Item::article("Second", 0, 2));
        let store = MemoryStore::new()
            .with_site(0, SiteInfo::new("en"))
            .with_article(0, 1, "<p>one</p>")
            .with_article(0, 2, "<ul><li>two</li></ul>");
        let (out, _) = render(&collection, &store).unwrap();
        assert_eq!(
            out,
            "Book\n\nA subtitle\n\nSummary text.\n\nFirst\n\none\n\nSecond\n\n  • two\n\n"
        );
    }

    #[test]
    fn test_chapters() {
        let collection = Collection::new("Book").with_item(Item::chapter(
            "Part I",
            vec![Item::article("Alpha", 0, 1)],
        ));
        let store = MemoryStore::new()
            .with_site(0, SiteInfo::new("en"))
            .with_article(0, 1, "<h2>Sub</h2><p>text</p>");
        let (out, stats) = render(&collection, &store).unwrap();
        assert_eq!(out, "Book\n\nPart I\n\nAlpha\n\nSub\n\ntext\n\n");
        assert_eq!(stats.chapters, 1);
        assert_eq!(stats.articles, 1);
    }

    #[test]
    fn test_missing_article_is_fatal() {
        let collection = Collection::new("Book").with_item(Item::article("Gone", 0, 9));
        let store = MemoryStore::new().with_site(0, SiteInfo::new("en"));
        assert!(matches!(
            render(&collection, &store),
            Err(Error::ArticleNotFound { wiki: 0, revision: 9 })
        ));
    }

    #[test]
    fn test_missing_site_is_fatal() {
        let collection = Collection::new("Book").with_item(Item::article("A", 4, 1));
        let store = MemoryStore::new().with_article(4, 1, "<p>x</p>");
        assert!(matches!(
            render(&collection, &store),
            Err(Error::SiteNotFound(4))
        ));
    }

    #[test]
    fn test_stats_collect_languages_and_macros() {
        let collection = Collection::new("Book")
            .with_item(Item::article("A", 0, 1))
            .with_item(Item::article("B", 1, 2));
        let math = r#"<p><span typeof="mw:Extension/math" data-mw='{"body":{"extsrc":"\\weird{x}"}}'></span></p>"#;
        let store = MemoryStore::new()
            .with_site(0, SiteInfo::new("en"))
            .with_site(1, SiteInfo::new("de"))
            .with_article(0, 1, math)
            .with_article(1, 2, r#"<p>Hallo <span lang="fr">salut</span></p>"#);
        let (_, stats) = render(&collection, &store).unwrap();
        assert_eq!(stats.languages, vec!["de", "en", "fr"]);
        assert_eq!(stats.unknown_macros, vec!["weird"]);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["articles"], 2);
    }
}
