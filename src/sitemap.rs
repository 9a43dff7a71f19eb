//! Sitemap assembly and rendering (sitemaps.org protocol).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::routes::ResolvedRoute;

pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";
pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const URLSET_OPEN: &str = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#;
pub const URLSET_CLOSE: &str = "</urlset>";

/// One `<url>` of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl SitemapEntry {
    /// The `<loc>` element exactly as rendered; also the dedup key.
    pub fn loc_tag(&self) -> String {
        loc_tag(&self.loc)
    }

    fn render_into(&self, out: &mut String) {
        out.push_str("<url>");
        out.push_str(&self.loc_tag());
        if let Some(at) = self.last_modified {
            out.push_str("<lastmod>");
            out.push_str(&format_lastmod(at));
            out.push_str("</lastmod>");
        }
        out.push_str("</url>");
    }
}

/// Assembled entries in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    entries: Vec<SitemapEntry>,
}

impl SitemapDocument {
    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as one unbroken string.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            XML_HEADER.len() + URLSET_OPEN.len() + URLSET_CLOSE.len() + self.entries.len() * 96,
        );
        out.push_str(XML_HEADER);
        out.push_str(URLSET_OPEN);
        for entry in &self.entries {
            entry.render_into(&mut out);
        }
        out.push_str(URLSET_CLOSE);
        out
    }

    /// Write `dir/sitemap.xml`, creating `dir` if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(SITEMAP_FILE_NAME);
        let write_error = |source| Error::Write {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(dir).map_err(write_error)?;
        fs::write(&path, self.render()).map_err(write_error)?;
        Ok(path)
    }
}

/// Folds resolved routes into a deduplicated document.
#[derive(Debug)]
pub struct SitemapAssembler {
    base_url: String,
    include_last_modified: bool,
    entries: Vec<SitemapEntry>,
    seen: HashSet<String>,
}

impl SitemapAssembler {
    pub fn new(base_url: &str, include_last_modified: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            include_last_modified,
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// `base + suffix`, or `base/prefix/suffix` for classed routes.
    pub fn compose_url(&self, route: &ResolvedRoute) -> String {
        match route.route_class.as_deref() {
            Some(prefix) => format!(
                "{}/{}/{}",
                self.base_url,
                prefix,
                route.suffix.trim_start_matches('/')
            ),
            None => format!("{}{}", self.base_url, route.suffix),
        }
    }

    /// Append a route unless its `<loc>` was already emitted. Returns whether it was added.
    pub fn push(&mut self, route: &ResolvedRoute) -> bool {
        let loc = self.compose_url(route);
        if !self.seen.insert(loc_tag(&loc)) {
            tracing::debug!(%loc, "skipping duplicate url");
            return false;
        }
        let last_modified = self.include_last_modified.then(Utc::now);
        self.entries.push(SitemapEntry { loc, last_modified });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> SitemapDocument {
        SitemapDocument {
            entries: self.entries,
        }
    }
}

fn loc_tag(url: &str) -> String {
    format!("<loc>{}</loc>", escape_xml(url))
}

/// RFC 3339 with milliseconds and a `Z` suffix, e.g. `2026-10-18T12:00:00.000Z`.
pub fn format_lastmod(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn escape_xml(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
