//! Dynamic segment expansion (`/users/:id` -> `/users/42`, ...).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::routes::extract::{Page, RouteRecord};

/// First path-component-level dynamic marker, e.g. `/:name`.
static DYNAMIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/:[^/]+").expect("dynamic segment pattern is valid"));

/// What to do with a dynamic route when there is nothing to expand it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UnresolvedPolicy {
    /// Leave the route out of the sitemap.
    #[default]
    Drop,
    /// Emit the template with its `:param` marker intact.
    #[value(name = "keep")]
    KeepPlaceholder,
}

/// Pages collected from typed tables across the whole project.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageTable {
    pages: Vec<Page>,
}

impl PageTable {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

impl Extend<Page> for PageTable {
    fn extend<I: IntoIterator<Item = Page>>(&mut self, iter: I) {
        self.pages.extend(iter);
    }
}

/// A URL suffix ready for the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route_class: Option<String>,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No dynamic segment: the template is the suffix.
    Static(ResolvedRoute),
    /// One suffix per page in the table.
    Expanded(Vec<ResolvedRoute>),
    /// Dynamic, no pages, kept verbatim by policy.
    Placeholder(ResolvedRoute),
    /// Dynamic, no pages, dropped by policy.
    Dropped,
}

impl Resolution {
    pub fn into_routes(self) -> Vec<ResolvedRoute> {
        match self {
            Resolution::Static(route) | Resolution::Placeholder(route) => vec![route],
            Resolution::Expanded(routes) => routes,
            Resolution::Dropped => Vec::new(),
        }
    }
}

/// The `:name` marker of the first dynamic segment, if any.
pub fn dynamic_marker(template: &str) -> Option<&str> {
    DYNAMIC_SEGMENT.find(template).map(|m| &m.as_str()[1..])
}

/// Expand the first dynamic segment of `record` against `pages`.
///
/// An empty table counts as unavailable.
pub fn resolve(record: &RouteRecord, pages: &PageTable, policy: UnresolvedPolicy) -> Resolution {
    let make = |suffix: String| ResolvedRoute {
        route_class: record.route_class.clone(),
        suffix,
    };

    let Some(marker) = dynamic_marker(&record.path_template) else {
        return Resolution::Static(make(record.path_template.clone()));
    };

    if pages.is_empty() {
        return match policy {
            UnresolvedPolicy::Drop => Resolution::Dropped,
            UnresolvedPolicy::KeepPlaceholder => {
                Resolution::Placeholder(make(record.path_template.clone()))
            }
        };
    }

    Resolution::Expanded(
        pages
            .iter()
            .map(|page| {
                let value = page.url.rsplit('/').next().unwrap_or_default();
                make(record.path_template.replacen(marker, value, 1))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(urls: &[&str]) -> PageTable {
        PageTable::new(urls.iter().map(|url| Page { url: url.to_string() }).collect())
    }

    #[test]
    fn test_dynamic_marker() {
        assert_eq!(dynamic_marker("/users/:id"), Some(":id"));
        assert_eq!(dynamic_marker("/page/:name/edit"), Some(":name"));
        assert_eq!(dynamic_marker("/a/:x/:y"), Some(":x"));
        assert_eq!(dynamic_marker("/about"), None);
        // Only a whole path component counts.
        assert_eq!(dynamic_marker("/time:12"), None);
    }

    #[test]
    fn test_static_passes_through() {
        let record = RouteRecord::markup("/about");
        let resolved = resolve(&record, &pages(&["/page/x"]), UnresolvedPolicy::Drop);
        assert_eq!(
            resolved,
            Resolution::Static(ResolvedRoute {
                route_class: None,
                suffix: "/about".into()
            })
        );
    }

    #[test]
    fn test_expands_against_last_url_segment() {
        let record = RouteRecord::markup("/page/:name");
        let routes = resolve(
            &record,
            &pages(&["/page/Inbox", "/page/Outbox"]),
            UnresolvedPolicy::Drop,
        )
        .into_routes();
        let suffixes: Vec<_> = routes.iter().map(|r| r.suffix.as_str()).collect();
        assert_eq!(suffixes, vec!["/page/Inbox", "/page/Outbox"]);
    }

    #[test]
    fn test_only_first_segment_is_substituted() {
        let record = RouteRecord::markup("/a/:x/:y");
        let routes = resolve(&record, &pages(&["/p/1"]), UnresolvedPolicy::Drop).into_routes();
        assert_eq!(routes[0].suffix, "/a/1/:y");
    }

    #[test]
    fn test_no_pages_drops_by_default() {
        let record = RouteRecord::markup("/users/:id");
        let resolved = resolve(&record, &PageTable::default(), UnresolvedPolicy::default());
        assert_eq!(resolved, Resolution::Dropped);
        assert!(resolved.into_routes().is_empty());
    }

    #[test]
    fn test_no_pages_keeps_placeholder_when_asked() {
        let record = RouteRecord::markup("/users/:id");
        let routes = resolve(&record, &PageTable::default(), UnresolvedPolicy::KeepPlaceholder)
            .into_routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].suffix, "/users/:id");
    }

    #[test]
    fn test_route_class_is_carried() {
        let record = RouteRecord::classed("page", "Inbox");
        let routes = resolve(&record, &PageTable::default(), UnresolvedPolicy::Drop).into_routes();
        assert_eq!(routes[0].route_class.as_deref(), Some("page"));
    }
}
