//! Route discovery: AST-based extraction of router declarations
//!
//! This module parses React / Ionic React source files with tree-sitter and
//! pulls out the routes they declare, either as JSX routing elements or as
//! typed page tables.
//!
//! ## Architecture
//!
//! ```text
//! routes/
//! ├── mod.rs         - Entry point, language dispatch, parsing
//! ├── common.rs      - Node text and literal helpers
//! ├── syntax.rs      - Closed set of node shapes (RouteNode)
//! ├── extract.rs     - Extraction rules
//! └── resolve.rs     - Dynamic segment expansion
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use routes::{extract_source, RouteExtractor, SupportedLanguage};
//!
//! let extractor = RouteExtractor::new(&class_map, &elements);
//! let found = extract_source(r#"<Route path="/a" />"#, SupportedLanguage::TypeScriptTsx, path, extractor)?;
//! ```

pub mod common;
pub mod extract;
pub mod resolve;
pub mod syntax;

use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{Error, Result};

pub use extract::{Extraction, Page, RouteExtractor, RouteRecord};
pub use resolve::{resolve, PageTable, Resolution, ResolvedRoute, UnresolvedPolicy};

// ============ Supported Languages ============

/// Source languages that can declare routes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupportedLanguage {
    TypeScript,
    TypeScriptTsx,
    JavaScript,
}

impl SupportedLanguage {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::TypeScriptTsx),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the tree-sitter language for this file type
    fn tree_sitter_language(&self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::TypeScriptTsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            // The JavaScript grammar includes JSX.
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

// ============ Result Type ============

/// Routes and pages found in one source file
#[derive(Debug, Clone)]
pub struct FileRoutes {
    pub path: PathBuf,
    pub extraction: Extraction,
}

// ============ Main Entry Points ============

/// Parse source text into a syntax tree, failing on any syntax error.
pub fn parse_source(content: &str, lang: SupportedLanguage, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| Error::Language {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let tree = parser.parse(content, None).ok_or_else(|| Error::Parse {
        path: path.to_path_buf(),
        line: 1,
        column: 1,
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let at = first_error_node(root).unwrap_or(root).start_position();
        return Err(Error::Parse {
            path: path.to_path_buf(),
            line: at.row + 1,
            column: at.column + 1,
        });
    }

    Ok(tree)
}

/// Parse `content` and run the extractor over it.
pub fn extract_source(
    content: &str,
    lang: SupportedLanguage,
    path: &Path,
    extractor: RouteExtractor,
) -> Result<Extraction> {
    let tree = parse_source(content, lang, path)?;
    Ok(extractor.extract(tree.root_node(), content.as_bytes()))
}

/// Read, parse and extract one file. The language comes from its extension.
pub fn extract_file(path: &Path, extractor: RouteExtractor) -> Result<FileRoutes> {
    let lang = SupportedLanguage::from_path(path).ok_or_else(|| Error::Language {
        path: path.to_path_buf(),
        message: "unsupported file extension".to_string(),
    })?;
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let extraction = extract_source(&content, lang, path, extractor)?;
    tracing::debug!(
        file = %path.display(),
        records = extraction.records.len(),
        pages = extraction.pages.len(),
        "extracted routes"
    );

    Ok(FileRoutes {
        path: path.to_path_buf(),
        extraction,
    })
}

/// Depth-first search for the first `ERROR` or `MISSING` node.
fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}
