//! Errors surfaced when a save archive cannot be parsed at all

use std::path::PathBuf;

/// Archive-structure failures. Everything else (missing cross-references,
/// malformed instance files) is absorbed by the parsers with a default.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The archive contained no entries.
    #[error("archive is empty")]
    EmptyArchive,

    /// The first entry has no leading folder to use as the save root.
    #[error("no save root folder found in archive")]
    MissingRoot,

    /// No `Products/Products.json` manifest under the save root.
    #[error("no products manifest found under '{root}/Products'")]
    MissingProductsManifest { root: String },

    /// The products manifest exists but is not valid JSON of the expected shape.
    #[error("invalid products manifest {path}: {source}")]
    InvalidManifest {
        path: String,
        source: serde_json::Error,
    },

    /// Walking an unpacked save directory failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// The customer order pattern failed to compile.
    #[error("invalid order pattern: {0}")]
    OrderPattern(#[from] regex::Error),

    /// The save directory path has no usable folder name.
    #[error("save directory {0} has no folder name")]
    UnnamedDirectory(PathBuf),
}
