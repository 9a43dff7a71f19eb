//! Error taxonomy for a sitemap generation run.
//!
//! Structural non-matches inside the extractor are not errors; they simply
//! produce no records. Everything here aborts the run.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or unresolvable configuration. Raised before any file is read.
    #[error("configuration error: {0}")]
    Config(String),

    /// A candidate source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tree-sitter grammar could not be loaded into the parser.
    #[error("failed to load grammar for {}: {message}", .path.display())]
    Language { path: PathBuf, message: String },

    /// A candidate source file does not conform to the grammar.
    #[error("failed to parse {} at line {line}, column {column}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    /// The sitemap could not be written to the output directory.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
