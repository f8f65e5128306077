//! Article and site lookup.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Collection, SiteInfo};

/// Source of article bodies and site metadata.
///
/// Implement this trait to render collections from another storage layout.
pub trait ArticleStore {
    /// Get the HTML body of an article revision.
    fn article_html(&self, wiki: usize, revision: u64) -> Result<String>;

    /// Get the metadata of a wiki.
    fn site_info(&self, wiki: usize) -> Result<SiteInfo>;
}

/// In-memory store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    articles: HashMap<(usize, u64), String>,
    sites: HashMap<usize, SiteInfo>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an article body.
    pub fn with_article(mut self, wiki: usize, revision: u64, html: impl Into<String>) -> Self {
        self.articles.insert((wiki, revision), html.into());
        self
    }

    /// Add site metadata.
    pub fn with_site(mut self, wiki: usize, site: SiteInfo) -> Self {
        self.sites.insert(wiki, site);
        self
    }
}

impl ArticleStore for MemoryStore {
    fn article_html(&self, wiki: usize, revision: u64) -> Result<String> {
        self.articles
            .get(&(wiki, revision))
            .cloned()
            .ok_or(Error::ArticleNotFound { wiki, revision })
    }

    fn site_info(&self, wiki: usize) -> Result<SiteInfo> {
        self.sites
            .get(&wiki)
            .cloned()
            .ok_or(Error::SiteNotFound(wiki))
    }
}

/// An extracted bundle directory.
///
/// Layout:
///
/// ```text
/// outline.json             collection manifest
/// siteinfo.json            {"<wiki>": {"general": {"lang": ...}}, ...}
/// html/<wiki>/<rev>.html   article bodies
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    sites: HashMap<usize, SiteInfo>,
}

impl DirectoryStore {
    /// Manifest file name.
    pub const OUTLINE: &'static str = "outline.json";
    /// Site metadata file name.
    pub const SITEINFO: &'static str = "siteinfo.json";

    /// Open a bundle directory, loading its site metadata.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(Error::Workspace(format!(
                "bundle directory {} does not exist",
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(Error::Workspace(format!(
                "bundle path {} is not a directory (unpack the archive first)",
                root.display()
            )));
        }
        let root = root.canonicalize()?;

        let siteinfo = root.join(Self::SITEINFO);
        let sites = if siteinfo.is_file() {
            let records: HashMap<String, serde_json::Value> =
                serde_json::from_str(&fs::read_to_string(&siteinfo)?)?;
            let mut sites = HashMap::new();
            for (key, record) in records {
                let wiki = key.trim().parse::<usize>().map_err(|_| {
                    Error::Workspace(format!("invalid wiki id {:?} in {}", key, Self::SITEINFO))
                })?;
                sites.insert(wiki, SiteInfo::from_value(record)?);
            }
            sites
        } else {
            log::debug!("No {} in {}", Self::SITEINFO, root.display());
            HashMap::new()
        };

        Ok(Self { root, sites })
    }

    /// Get the bundle root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the collection manifest.
    pub fn collection(&self) -> Result<Collection> {
        let path = self.root.join(Self::OUTLINE);
        let json = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::Workspace(format!(
                "bundle {} has no {}",
                self.root.display(),
                Self::OUTLINE
            )),
            _ => Error::Io(e),
        })?;
        Collection::from_json(&json)
    }

    /// Resolve a path inside the bundle, rejecting anything that escapes it.
    fn resolve(&self, relative: &Path) -> Result<Option<PathBuf>> {
        let path = self.root.join(relative);
        let path = match path.canonicalize() {
            Ok(path) => path,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !path.starts_with(&self.root) {
            return Err(Error::Workspace(format!(
                "{} resolves outside the bundle root",
                relative.display()
            )));
        }
        Ok(Some(path))
    }
}

impl ArticleStore for DirectoryStore {
    fn article_html(&self, wiki: usize, revision: u64) -> Result<String> {
        let relative = Path::new("html")
            .join(wiki.to_string())
            .join(format!("{}.html", revision));
        let path = self
            .resolve(&relative)?
            .ok_or(Error::ArticleNotFound { wiki, revision })?;
        Ok(fs::read_to_string(path)?)
    }

    fn site_info(&self, wiki: usize) -> Result<SiteInfo> {
        self.sites
            .get(&wiki)
            .cloned()
            .ok_or(Error::SiteNotFound(wiki))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("outline.json"),
            r#"{"title": "Bundle", "items": [{"type": "article", "title": "A", "revision": 5, "wiki": 0}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("siteinfo.json"),
            r#"{"0": {"general": {"lang": "fr", "sitename": "Wikipédia"}}}"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("html/0")).unwrap();
        fs::write(dir.path().join("html/0/5.html"), "<p>Bonjour</p>").unwrap();
        dir
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new()
            .with_article(0, 1, "<p>x</p>")
            .with_site(0, SiteInfo::new("en"));
        assert_eq!(store.article_html(0, 1).unwrap(), "<p>x</p>");
        assert_eq!(store.site_info(0).unwrap().lang, "en");
        assert!(matches!(
            store.article_html(0, 2),
            Err(Error::ArticleNotFound { wiki: 0, revision: 2 })
        ));
        assert!(matches!(store.site_info(3), Err(Error::SiteNotFound(3))));
    }

    #[test]
    fn test_directory_store() {
        let dir = bundle();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert_eq!(store.collection().unwrap().title, "Bundle");
        assert_eq!(store.site_info(0).unwrap().lang, "fr");
        assert_eq!(store.article_html(0, 5).unwrap(), "<p>Bonjour</p>");
        assert!(matches!(
            store.article_html(0, 6),
            Err(Error::ArticleNotFound { .. })
        ));
        assert!(matches!(store.site_info(1), Err(Error::SiteNotFound(1))));
    }

    #[test]
    fn test_directory_store_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            DirectoryStore::open(&missing),
            Err(Error::Workspace(_))
        ));

        let file = dir.path().join("bundle.zip");
        fs::write(&file, b"PK").unwrap();
        assert!(matches!(DirectoryStore::open(&file), Err(Error::Workspace(_))));
    }

    #[test]
    fn test_directory_store_missing_outline() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert!(matches!(store.collection(), Err(Error::Workspace(_))));
    }

    #[test]
    fn test_directory_store_malformed_siteinfo() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("siteinfo.json"), "{oops").unwrap();
        assert!(matches!(
            DirectoryStore::open(dir.path()),
            Err(Error::Json(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_store_rejects_escaping_links() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.html"), "<p>secret</p>").unwrap();

        let dir = bundle();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("html/9")).unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        fs::rename(
            outside.path().join("secret.html"),
            outside.path().join("1.html"),
        )
        .unwrap();
        assert!(matches!(
            store.article_html(9, 1),
            Err(Error::Workspace(_))
        ));
    }
}
