//! Error taxonomy for dataset construction and retrieval.
//!
//! Every failure is fatal to the operation that raised it; there is no retry
//! and no partial-dataset fallback, because an incomplete dataset would break
//! the positional correspondence between images, labels and boxes.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration: unknown split name.
    #[error("unsupported split '{given}', expected 'train' or 'val'")]
    UnsupportedSplit { given: String },

    /// Configuration: a class directory is too short for the requested slice.
    #[error(
        "class '{class}' has only {found} entries in '{}', \
         but the requested split needs the first {required}",
        path.display()
    )]
    InsufficientEntries {
        class: String,
        path: PathBuf,
        required: usize,
        found: usize,
    },

    /// Configuration: the root directory contains no class subdirectories.
    #[error("no class directories found under '{}'", path.display())]
    NoClasses { path: PathBuf },

    /// I/O: a directory listing failed.
    #[error("failed to list directory '{}'", path.display())]
    DirectoryList {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O: an image file could not be decoded.
    #[error("failed to decode image '{}'", path.display())]
    ImageRead {
        path: PathBuf,
        source: image::ImageError,
    },

    /// I/O: an annotation table could not be read.
    #[error("failed to read annotation table '{}'", path.display())]
    AnnotationRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O: an annotation row could not be parsed.
    #[error("bad annotation row at {}:{line}: {reason}", path.display())]
    AnnotationParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Data integrity: no unambiguous annotation table for a class.
    #[error(
        "class '{class}' has no unambiguous annotation table under '{}'",
        path.display()
    )]
    AnnotationTableMissing { class: String, path: PathBuf },

    /// Data integrity: an annotation table is too short for the slice.
    #[error(
        "annotation table '{}' has {found} rows, the requested split needs {required}",
        path.display()
    )]
    RowCountMismatch {
        path: PathBuf,
        required: usize,
        found: usize,
    },

    /// Data integrity: a row's class id disagrees with its class block.
    #[error(
        "annotation row at {}:{line} carries zero-based class id {found}, \
         expected {expected}",
        path.display()
    )]
    ClassIdMismatch {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: i64,
    },

    /// Data integrity: a box with non-positive height or width.
    #[error("degenerate box at {}:{line}", path.display())]
    DegenerateBox { path: PathBuf, line: usize },

    /// Index: out-of-range sample retrieval.
    #[error("sample index {index} out of range, dataset holds {len} records")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Precondition: the overlay geometry requires a square source image.
    #[error("overlay requires a square image, got {height}x{width}")]
    NonSquareImage { height: u32, width: u32 },
}
