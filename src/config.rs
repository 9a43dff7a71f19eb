//! Run configuration: route classes, recognized elements, paths and the base URL.

use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::routes::UnresolvedPolicy;

// ============ Constants ============

pub const DEFAULT_BUILD_PATH: &str = "build";
pub const DEFAULT_APP_PATHS: [&str; 4] = ["src/App.js", "src/App.jsx", "src/App.tsx", "src/App.ts"];
pub const DEFAULT_ROUTE_CLASS: (&str, &str) = ("AppPage", "page");
pub const DEFAULT_ELEMENTS: [&str; 3] = ["Route", "IonRoute", "Redirect"];
pub const DEFAULT_BASE_URL: &str = "https://example.com";

// ============ Route classes and elements ============

/// Typed-table element type name -> URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteClassMap {
    prefixes: HashMap<String, String>,
}

impl RouteClassMap {
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefixes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build from a flat `[class, prefix, class, prefix, ...]` list.
    pub fn from_pairs(values: &[String]) -> Result<Self> {
        if values.len() % 2 != 0 {
            return Err(Error::config(format!(
                "--paths expects class/prefix pairs, got {} values",
                values.len()
            )));
        }
        Ok(Self::new(
            values
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone())),
        ))
    }

    pub fn prefix_for(&self, class_name: &str) -> Option<&str> {
        self.prefixes.get(class_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for RouteClassMap {
    fn default() -> Self {
        Self::new([DEFAULT_ROUTE_CLASS])
    }
}

/// JSX tag names that declare routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedElementSet {
    names: HashSet<String>,
}

impl RecognizedElementSet {
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.names.contains(tag)
    }
}

impl Default for RecognizedElementSet {
    fn default() -> Self {
        Self::from_names(DEFAULT_ELEMENTS)
    }
}

// ============ Run configuration ============

#[derive(Debug, Clone)]
pub struct SitemapConfig {
    /// Prefix of every `<loc>`, stored without a trailing slash.
    pub base_url: String,
    pub app_path: PathBuf,
    pub build_path: PathBuf,
    pub route_classes: RouteClassMap,
    pub elements: RecognizedElementSet,
    pub include_last_modified: bool,
    pub unresolved: UnresolvedPolicy,
}

impl SitemapConfig {
    pub fn new(base_url: &str, app_path: impl Into<PathBuf>, build_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            app_path: app_path.into(),
            build_path: build_path.into(),
            route_classes: RouteClassMap::default(),
            elements: RecognizedElementSet::default(),
            include_last_modified: true,
            unresolved: UnresolvedPolicy::default(),
        }
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Use the explicit app path if given, otherwise the first default candidate
/// that exists under `cwd`.
pub fn resolve_app_path(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let path = absolutize(path, cwd);
        if !path.is_file() {
            return Err(Error::config(format!(
                "app path does not exist: {}",
                path.display()
            )));
        }
        return Ok(path);
    }

    DEFAULT_APP_PATHS
        .iter()
        .map(|candidate| cwd.join(candidate))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            Error::config(format!(
                "no app entry found (tried {}); please specify the app path with --app-path",
                DEFAULT_APP_PATHS.join(", ")
            ))
        })
}

pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

// ============ Base URL ============

/// Candidate base URLs, highest priority first.
#[derive(Debug, Default, Clone)]
pub struct BaseUrlSources {
    /// Typed at the interactive prompt.
    pub answer: Option<String>,
    /// `--url`.
    pub configured: Option<String>,
    /// `homepage` from package.json.
    pub homepage: Option<String>,
}

impl BaseUrlSources {
    /// First non-blank candidate, or the fixed default.
    pub fn resolve(&self) -> String {
        [&self.answer, &self.configured, &self.homepage]
            .into_iter()
            .flatten()
            .map(|url| url.trim())
            .find(|url| !url.is_empty())
            .map(normalize_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

/// Ask for the base URL, showing `default` in parentheses.
///
/// Returns `None` on an empty answer or closed input.
pub fn prompt_base_url<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default: &str,
) -> io::Result<Option<String>> {
    write!(output, "What is the base URL for your app? ({}) ", default)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(None);
    }
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}
