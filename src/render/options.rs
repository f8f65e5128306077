//! Rendering options and configuration.

use crate::error::{Error, Result};

use super::Direction;

/// Minimum number of usable columns a wrapped line keeps after indentation.
pub const MIN_USABLE_COLUMNS: usize = 20;

/// Options for rendering document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Target column width for word wrapping
    pub column_width: usize,

    /// Columns added per indent scope
    pub tab_width: usize,

    /// Only compress whitespace and indent, never break lines
    pub no_wrap: bool,

    /// Skip footnote lists entirely
    pub suppress_footnotes: bool,

    /// Language before any site or element override
    pub default_language: String,

    /// Directionality before any site or element override
    pub default_direction: Direction,

    /// The collection contains chapters, so article headings sit one level deeper
    pub has_chapters: bool,

    /// The collection holds exactly one article
    pub single_item: bool,

    /// Wrap text running against the base direction in Unicode isolate marks
    pub bidi_isolation: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wrap column width.
    pub fn with_column_width(mut self, width: usize) -> Self {
        self.column_width = width;
        self
    }

    /// Set the indent step.
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// Enable or disable no-wrap mode.
    pub fn with_no_wrap(mut self, no_wrap: bool) -> Self {
        self.no_wrap = no_wrap;
        self
    }

    /// Enable or disable footnote suppression.
    pub fn with_suppress_footnotes(mut self, suppress: bool) -> Self {
        self.suppress_footnotes = suppress;
        self
    }

    /// Set the default language.
    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.default_language = lang.into();
        self
    }

    /// Set the default directionality.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.default_direction = direction;
        self
    }

    /// Mark the collection as containing chapters.
    pub fn with_chapters(mut self, has_chapters: bool) -> Self {
        self.has_chapters = has_chapters;
        self
    }

    /// Mark the collection as holding a single article.
    pub fn with_single_item(mut self, single_item: bool) -> Self {
        self.single_item = single_item;
        self
    }

    /// Enable or disable bidi isolation marks.
    pub fn with_bidi_isolation(mut self, enabled: bool) -> Self {
        self.bidi_isolation = enabled;
        self
    }

    /// Check that the options describe a layout that can be rendered.
    pub fn validate(&self) -> Result<()> {
        if self.column_width < MIN_USABLE_COLUMNS {
            return Err(Error::InvalidOption(format!(
                "column width {} is below the minimum of {}",
                self.column_width, MIN_USABLE_COLUMNS
            )));
        }
        if self.tab_width == 0 {
            return Err(Error::InvalidOption("tab width must be positive".into()));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            column_width: 75,
            tab_width: 2,
            no_wrap: false,
            suppress_footnotes: false,
            default_language: "en".to_string(),
            default_direction: Direction::Ltr,
            has_chapters: false,
            single_item: false,
            bidi_isolation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_column_width(60)
            .with_tab_width(4)
            .with_no_wrap(true)
            .with_language("he")
            .with_direction(Direction::Rtl);

        assert_eq!(options.column_width, 60);
        assert_eq!(options.tab_width, 4);
        assert!(options.no_wrap);
        assert_eq!(options.default_language, "he");
        assert_eq!(options.default_direction, Direction::Rtl);
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.column_width, 75);
        assert_eq!(options.tab_width, 2);
        assert!(!options.suppress_footnotes);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_narrow_layouts() {
        assert!(RenderOptions::new().with_column_width(10).validate().is_err());
        assert!(RenderOptions::new().with_tab_width(0).validate().is_err());
    }
}
