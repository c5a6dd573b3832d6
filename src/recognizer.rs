//! Optical character recognition behind a narrow `pixels -> text` interface.

use crate::{OcrConfig, RasterImage, RenameError, Result};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Something that reads the text in a raster image.
///
/// Implementations return one line per detected text region, joined with
/// `\n`.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &RasterImage) -> Result<String>;
}

/// Trim every line and drop the blank ones the engine puts between blocks.
#[cfg(feature = "ocr")]
pub(crate) fn collect_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Tesseract ────────────────────────────────────────────────────────────────

/// Tesseract with the LSTM models and dictionary correction of the configured
/// languages.
#[cfg(feature = "ocr")]
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    languages: String,
    tessdata_dir: Option<String>,
}

#[cfg(feature = "ocr")]
impl TesseractRecognizer {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            languages: config.language_spec(),
            tessdata_dir: config
                .tessdata_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
        }
    }
}

#[cfg(feature = "ocr")]
impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &RasterImage) -> Result<String> {
        use tesseract::Tesseract;

        let mut tesseract = Tesseract::new(self.tessdata_dir.as_deref(), Some(self.languages.as_str()))
            .map_err(|e| RenameError::Ocr(format!("failed to initialise Tesseract for '{}': {e}", self.languages)))?
            // Thai has no spaces between words; keep the ones the engine does see.
            .set_variable("preserve_interword_spaces", "1")
            .map_err(|e| RenameError::Ocr(format!("failed to set variable: {e}")))?
            .set_frame(
                &image.pixels,
                image.width as i32,
                image.height as i32,
                RasterImage::BYTES_PER_PIXEL as i32,
                image.bytes_per_line() as i32,
            )
            .map_err(|e| RenameError::Ocr(format!("failed to set image: {e}")))?
            .recognize()
            .map_err(|e| RenameError::Ocr(format!("recognition failed: {e}")))?;

        let text = tesseract
            .get_text()
            .map_err(|e| RenameError::Ocr(format!("failed to read text: {e}")))?;

        Ok(collect_lines(&text))
    }
}

/// Stands in for the engine when the crate is built without `ocr`.
#[cfg(not(feature = "ocr"))]
#[derive(Debug, Clone, Copy)]
struct MissingEngine;

#[cfg(not(feature = "ocr"))]
impl Recognizer for MissingEngine {
    fn recognize(&self, _image: &RasterImage) -> Result<String> {
        Err(RenameError::Ocr("OCR is not available; build with the `ocr` feature".into()))
    }
}

/// The engine this build provides, bounded by the configured timeout.
pub fn default_recognizer(config: &OcrConfig) -> BoundedRecognizer {
    #[cfg(feature = "ocr")]
    let engine: Arc<dyn Recognizer> = Arc::new(TesseractRecognizer::new(config));
    #[cfg(not(feature = "ocr"))]
    let engine: Arc<dyn Recognizer> = Arc::new(MissingEngine);

    BoundedRecognizer::new(engine, config.timeout)
}

// ── BoundedRecognizer ────────────────────────────────────────────────────────

/// Runs another recognizer on a worker thread and gives up after `timeout`.
///
/// The engine offers no cancellation, so a worker that overruns is detached
/// and its eventual result dropped. The caller continues with
/// [`RenameError::OcrTimeout`].
#[derive(Clone)]
pub struct BoundedRecognizer {
    inner: Arc<dyn Recognizer>,
    timeout: Duration,
}

impl BoundedRecognizer {
    pub fn new(inner: Arc<dyn Recognizer>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl Recognizer for BoundedRecognizer {
    fn recognize(&self, image: &RasterImage) -> Result<String> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let image = image.clone();

        thread::Builder::new()
            .name("ocr-worker".into())
            .spawn(move || {
                // The receiver is gone if the call already timed out.
                let _ = tx.send(inner.recognize(&image));
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(RenameError::OcrTimeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(RenameError::Ocr("recognition worker stopped without a result".into()))
            }
        }
    }
}
