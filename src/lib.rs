//! # idcard-rename
//!
//! A Rust library for renaming a folder of scanned Thai identity documents
//! (images or PDFs) to canonical, collision-free filenames.
//!
//! ## What this crate does
//!
//! 1. **Scan**: lists one directory and keeps the files carrying the batch
//!    prefix marker, in lexicographic order.
//! 2. **Identify**: takes the last 13-digit run of each filename as the
//!    person's identifier.
//! 3. **Extract text**: reads the embedded text of a PDF, falling back to
//!    rasterizing the document and running OCR over the image.
//! 4. **Parse**: recovers `(title, first name, last name)` from the text.
//! 5. **Plan & apply**: builds `{title}_{first}_{last}_{id}.{ext}`, resolves
//!    collisions with `_1`, `_2`, … suffixes, and optionally renames.
//!
//! ## Quick example
//!
//! ```no_run
//! use idcard_rename::{BatchRenamer, RenamerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renamer = BatchRenamer::new(RenamerConfig::new("./scans"));
//! let plan = renamer.plan()?;
//!
//! for rename in &plan.renames {
//!     println!("{} -> {}", rename.source, rename.target);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

mod document;
mod extraction_engine;
mod naming;
mod patterns;
mod planner;
mod rasterizer;
mod recognizer;
mod renamer;
mod scanner;
mod structured_text;

pub use document::{Document, DocumentKind};
pub use extraction_engine::{ExtractionEngine, RasterizeAndRecognizeExtractor, TextExtractor};
pub use naming::{canonical_base, sanitize_segment, CanonicalName};
pub use patterns::{extract_identifier, extract_identity, normalize, Identity, Title};
pub use planner::{RenamePlan, RenamePlanner};
pub use rasterizer::{RasterImage, Rasterizer};
pub use recognizer::{default_recognizer, BoundedRecognizer, Recognizer};
#[cfg(feature = "ocr")]
pub use recognizer::TesseractRecognizer;
pub use renamer::{BatchPlan, BatchRenamer, MoveOutcome, Unresolved, UnresolvedReason};
pub use scanner::{scan_directory, DirectoryListing};
pub use structured_text::StructuredExtractor;

// ── Configuration ────────────────────────────────────────────────────────────

/// Marker every file of a batch starts with before it has been renamed.
pub const DEFAULT_PREFIX: &str = "เอกสาร_";

/// Width in pixels a PDF page is rendered to before recognition.
pub const DEFAULT_TARGET_WIDTH: u32 = 2400;

/// Upper bound for a single recognition call.
pub const DEFAULT_OCR_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for the rasterize-and-recognize strategy.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Recognition languages, most expected first (Tesseract codes).
    pub languages: Vec<String>,

    /// Directory holding the `*.traineddata` files. `None` lets the engine
    /// fall back to `TESSDATA_PREFIX` or its compiled-in default.
    pub tessdata_dir: Option<PathBuf>,

    /// Pixel width PDF pages are scaled to; height follows the aspect ratio.
    pub target_width: u32,

    /// Recognition calls running longer than this yield no text.
    pub timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: vec!["tha".into(), "eng".into()],
            tessdata_dir: None,
            target_width: DEFAULT_TARGET_WIDTH,
            timeout: DEFAULT_OCR_TIMEOUT,
        }
    }
}

impl OcrConfig {
    /// Languages in the `tha+eng` form Tesseract expects.
    pub fn language_spec(&self) -> String {
        self.languages.join("+")
    }
}

/// Runtime configuration for [`BatchRenamer`]. Set once per invocation.
#[derive(Debug, Clone)]
pub struct RenamerConfig {
    /// Directory whose files are renamed. Not searched recursively.
    pub directory: PathBuf,

    /// Only files whose name starts with this marker are processed.
    pub prefix: String,

    /// When `false` the renamer only reports what it would do.
    pub apply: bool,

    pub ocr: OcrConfig,
}

impl RenamerConfig {
    /// Dry-run configuration for `directory` with every other value defaulted.
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            apply: false,
            ocr: OcrConfig::default(),
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum RenameError {
    /// The target directory could not be listed. Fatal for the whole batch.
    #[error("failed to read directory '{}': {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filesystem I/O error occurred while reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying lopdf parser returned an error.
    #[error("PDF parse error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// An image file could not be decoded.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// A PDF page could not be rendered to pixels.
    #[error("rasterization failed: {0}")]
    Render(String),

    /// The OCR engine failed to initialise or to recognise the image.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// The OCR engine did not answer within the configured bound.
    #[error("OCR timed out after {0:?}")]
    OcrTimeout(Duration),

    /// The document's extension is neither a PDF nor a known image format.
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    /// Apply found the planned target already present on disk.
    #[error("target '{0}' already exists")]
    TargetExists(String),

    /// The rename itself failed.
    #[error("failed to rename '{from}' to '{to}': {source}")]
    MoveFailed {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, RenameError>;
