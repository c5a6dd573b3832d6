//! Turns a document into pixels for recognition.
//!
//! Images are decoded as they are. PDFs render their first page only, scaled
//! to a fixed width. Everything is flattened onto opaque white so transparent
//! regions do not read as black to the OCR engine.

use crate::{Document, DocumentKind, RenameError, Result};
use std::path::Path;
use tracing::debug;

// ── RasterImage ──────────────────────────────────────────────────────────────

/// Packed 8-bit RGB pixels, row-major, no padding between rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub const BYTES_PER_PIXEL: u32 = 3;

    /// Composite RGBA pixels over a white background.
    pub fn from_rgba_on_white(width: u32, height: u32, rgba: &[u8]) -> Self {
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|px| {
                let alpha = u32::from(px[3]);
                let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
                [blend(px[0]), blend(px[1]), blend(px[2])]
            })
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn bytes_per_line(&self) -> u32 {
        self.width * Self::BYTES_PER_PIXEL
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// ── Rasterizer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Rasterizer {
    target_width: u32,
}

impl Rasterizer {
    /// `target_width` applies to PDF pages only; images keep their size.
    pub fn new(target_width: u32) -> Self {
        Self { target_width }
    }

    pub fn rasterize(&self, document: &Document) -> Result<RasterImage> {
        let image = match document.kind() {
            DocumentKind::Image => Self::decode_image(&document.path)?,
            DocumentKind::Pdf => self.render_first_page(&document.path)?,
            DocumentKind::Unsupported => {
                return Err(RenameError::UnsupportedFormat(document.extension.clone()))
            }
        };

        if image.is_empty() {
            return Err(RenameError::Render(format!("'{}' produced an empty image", document.file_name)));
        }

        debug!("rasterized '{}' to {}x{}", document.file_name, image.width, image.height);
        Ok(image)
    }

    /// Decode an image file into white-backed RGB.
    pub fn decode_image(path: &Path) -> Result<RasterImage> {
        let rgba = image::open(path)?.to_rgba8();
        Ok(RasterImage::from_rgba_on_white(rgba.width(), rgba.height(), rgba.as_raw()))
    }

    /// Render page one of a PDF at the configured width.
    #[cfg(feature = "pdfium")]
    fn render_first_page(&self, path: &Path) -> Result<RasterImage> {
        use pdfium_render::prelude::*;

        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| RenameError::Render(format!("failed to bind pdfium library: {e}")))?;
        let pdfium = Pdfium::new(bindings);

        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| RenameError::Render(format!("failed to load PDF: {e}")))?;

        let page = document
            .pages()
            .get(0)
            .map_err(|e| RenameError::Render(format!("failed to get first page: {e}")))?;

        // Height follows the page's aspect ratio when only the width is set.
        let config = PdfRenderConfig::new()
            .set_target_width(self.target_width as i32)
            .set_clear_color(PdfColor::WHITE)
            .render_form_data(true)
            .render_annotations(true);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RenameError::Render(format!("failed to render page: {e}")))?;

        let rgba = bitmap.as_image().to_rgba8();
        Ok(RasterImage::from_rgba_on_white(rgba.width(), rgba.height(), rgba.as_raw()))
    }

    #[cfg(not(feature = "pdfium"))]
    fn render_first_page(&self, _path: &Path) -> Result<RasterImage> {
        Err(RenameError::Render(
            "PDF rasterization is not available; build with the `pdfium` feature".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn transparent_pixels_become_white() {
        let image = RasterImage::from_rgba_on_white(2, 1, &[0, 0, 0, 0, 10, 20, 30, 255]);
        assert_eq!(image.pixels, vec![255, 255, 255, 10, 20, 30]);
        assert_eq!(image.bytes_per_line(), 6);
    }

    #[test]
    fn half_transparent_black_is_grey() {
        let image = RasterImage::from_rgba_on_white(1, 1, &[0, 0, 0, 128]);
        assert_eq!(image.pixels, vec![127, 127, 127]);
    }

    #[test]
    fn decodes_png_at_native_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("เอกสาร_1234567890123.png");
        RgbaImage::from_pixel(40, 25, Rgba([0, 0, 0, 255])).save(&path).unwrap();

        let doc = Document::new(dir.path(), "เอกสาร_1234567890123.png");
        let image = Rasterizer::new(2400).rasterize(&doc).unwrap();
        assert_eq!((image.width, image.height), (40, 25));
        assert_eq!(image.pixels.len(), 40 * 25 * 3);
    }

    #[test]
    fn corrupt_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();

        let doc = Document::new(dir.path(), "bad.png");
        assert!(Rasterizer::new(2400).rasterize(&doc).is_err());
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let doc = Document::new("/d", "notes.txt");
        let err = Rasterizer::new(2400).rasterize(&doc).unwrap_err();
        assert!(matches!(err, RenameError::UnsupportedFormat(ref ext) if ext == "txt"));
    }

    #[cfg(not(feature = "pdfium"))]
    #[test]
    fn pdf_needs_pdfium() {
        let doc = Document::new("/d", "scan.pdf");
        let err = Rasterizer::new(2400).rasterize(&doc).unwrap_err();
        assert!(matches!(err, RenameError::Render(_)));
    }
}
