use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub mod config;
pub mod error;
pub mod logging;
pub mod project;
pub mod routes;
pub mod sitemap;


pub use config::{RecognizedElementSet, RouteClassMap, SitemapConfig};
pub use error::{Error, Result};
pub use routes::{FileRoutes, PageTable, RouteExtractor, RouteRecord, UnresolvedPolicy};
pub use sitemap::{SitemapAssembler, SitemapDocument, SitemapEntry};

/// Directories never scanned for routes
const IGNORED_DIRS: [&str; 5] = ["node_modules", "build", "dist", "coverage", ".git"];

/// Summary of one generation run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub output_path: PathBuf,
    pub files_scanned: usize,
    pub records: usize,
    pub entries: usize,
    pub dropped_dynamic: usize,
}

/// Candidate source files under `root`, sorted by relative path.
///
/// Skips dependency and build output directories, `excluded_dir` (the output
/// directory of this run), declaration files and test files.
pub fn scan_project(root: &Path, excluded_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::config(format!(
            "project root is not a directory: {}",
            root.display()
        )));
    }

    let excluded = excluded_dir.and_then(|dir| dir.canonicalize().ok());
    let walker = WalkBuilder::new(root)
        .standard_filters(true)
        .filter_entry(move |entry| {
            let name = entry.file_name().to_string_lossy();
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());

            if is_dir {
                if IGNORED_DIRS.iter().any(|dir| name == *dir) {
                    return false;
                }
                if let Some(excluded) = &excluded {
                    if entry.path().canonicalize().is_ok_and(|p| &p == excluded) {
                        return false;
                    }
                }
            }
            true
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable path");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) || !is_candidate_source(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort_by(|a, b| {
        let a = a.strip_prefix(root).unwrap_or(a);
        let b = b.strip_prefix(root).unwrap_or(b);
        a.cmp(b)
    });

    Ok(files)
}

/// Route-bearing source file that is not a declaration or test file
fn is_candidate_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    if name.ends_with(".d.ts") || name.contains(".test.") || name.contains(".spec.") {
        return false;
    }
    routes::SupportedLanguage::from_path(path).is_some()
}

/// Extract every file in order. Parsing runs in parallel; the first failing
/// file in `files` order is the one reported.
pub fn extract_files(files: &[PathBuf], extractor: RouteExtractor) -> Result<Vec<FileRoutes>> {
    files
        .par_iter()
        .map(|path| routes::extract_file(path, extractor))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Resolve and fold all extracted routes into a document.
///
/// Pages from every file form one lookup table; records are folded in file
/// order so the first occurrence of a URL wins.
pub fn assemble(per_file: &[FileRoutes], config: &SitemapConfig) -> (SitemapDocument, usize) {
    let mut pages = PageTable::default();
    for file in per_file {
        pages.extend(file.extraction.pages.iter().cloned());
    }

    let mut assembler = SitemapAssembler::new(&config.base_url, config.include_last_modified);
    let mut dropped = 0;
    for file in per_file {
        for record in &file.extraction.records {
            match routes::resolve(record, &pages, config.unresolved) {
                routes::Resolution::Dropped => {
                    dropped += 1;
                    tracing::warn!(
                        file = %file.path.display(),
                        path = %record.path_template,
                        "dropping dynamic route: no page table to expand it with"
                    );
                }
                resolution => {
                    for route in resolution.into_routes() {
                        assembler.push(&route);
                    }
                }
            }
        }
    }

    (assembler.finish(), dropped)
}

/// Run the whole pipeline and write `build_path/sitemap.xml`.
pub fn generate_sitemap(config: &SitemapConfig) -> Result<GenerateReport> {
    let root = project::find_project_root(&config.app_path);
    let package = project::read_package_json(&root);
    tracing::info!(
        root = %root.display(),
        project = package.name.as_deref().unwrap_or("<unnamed>"),
        "scanning project"
    );

    let files = scan_project(&root, Some(&config.build_path))?;
    tracing::debug!(count = files.len(), "candidate source files");

    let extractor = RouteExtractor::new(&config.route_classes, &config.elements);
    let per_file = extract_files(&files, extractor)?;
    let records: usize = per_file.iter().map(|f| f.extraction.records.len()).sum();

    let (document, dropped_dynamic) = assemble(&per_file, config);
    let output_path = document.write_to(&config.build_path)?;
    tracing::info!(
        path = %output_path.display(),
        entries = document.len(),
        "sitemap written"
    );

    Ok(GenerateReport {
        output_path,
        files_scanned: files.len(),
        records,
        entries: document.len(),
        dropped_dynamic,
    })
}
