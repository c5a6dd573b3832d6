use crate::recognizer::{default_recognizer, Recognizer};
use crate::structured_text::StructuredExtractor;
use crate::{Document, DocumentKind, OcrConfig, Rasterizer, RenameError, Result};
use tracing::{debug, warn};

/// One way of getting text out of a document.
pub trait TextExtractor {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    /// Returns `true` when this strategy can handle the document's format.
    fn supports(&self, document: &Document) -> bool;

    fn extract(&self, document: &Document) -> Result<String>;
}

// ── RasterizeAndRecognizeExtractor ───────────────────────────────────────────

/// Renders the document to pixels and reads them with a [`Recognizer`].
pub struct RasterizeAndRecognizeExtractor<R> {
    rasterizer: Rasterizer,
    recognizer: R,
}

impl<R: Recognizer> RasterizeAndRecognizeExtractor<R> {
    pub fn new(rasterizer: Rasterizer, recognizer: R) -> Self {
        Self {
            rasterizer,
            recognizer,
        }
    }
}

impl<R: Recognizer> TextExtractor for RasterizeAndRecognizeExtractor<R> {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn supports(&self, document: &Document) -> bool {
        matches!(document.kind(), DocumentKind::Pdf | DocumentKind::Image)
    }

    fn extract(&self, document: &Document) -> Result<String> {
        if !self.supports(document) {
            return Err(RenameError::UnsupportedFormat(document.extension.clone()));
        }
        let image = self.rasterizer.rasterize(document)?;
        self.recognizer.recognize(&image)
    }
}

// ── ExtractionEngine ─────────────────────────────────────────────────────────

/// Tries its strategies in order and returns the first non-blank text.
///
/// Failures are logged and treated like an empty result, so the engine itself
/// never fails: an empty string is the single "no text" signal for callers.
pub struct ExtractionEngine {
    strategies: Vec<Box<dyn TextExtractor>>,
}

impl ExtractionEngine {
    pub fn new(strategies: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { strategies }
    }

    /// Embedded PDF text first, then rasterization plus OCR.
    pub fn from_config(config: &OcrConfig) -> Self {
        let ocr = RasterizeAndRecognizeExtractor::new(
            Rasterizer::new(config.target_width),
            default_recognizer(config),
        );
        Self::new(vec![Box::new(StructuredExtractor::new()), Box::new(ocr)])
    }

    /// Text of `document`, or an empty string when no strategy found any.
    pub fn extract_text(&self, document: &Document) -> String {
        for strategy in self.strategies.iter().filter(|s| s.supports(document)) {
            match strategy.extract(document) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(
                        "'{}': {} strategy produced {} chars",
                        document.file_name,
                        strategy.name(),
                        text.chars().count()
                    );
                    return text;
                }
                Ok(_) => debug!("'{}': {} strategy produced no text", document.file_name, strategy.name()),
                Err(e) => warn!("'{}': {} strategy failed: {}", document.file_name, strategy.name(), e),
            }
        }
        String::new()
    }
}

impl TextExtractor for ExtractionEngine {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn supports(&self, document: &Document) -> bool {
        self.strategies.iter().any(|s| s.supports(document))
    }

    fn extract(&self, document: &Document) -> Result<String> {
        Ok(self.extract_text(document))
    }
}
