use std::path::{Path, PathBuf};

// ── DocumentKind ─────────────────────────────────────────────────────────────

/// How a document's pixels and text can be reached, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A page-description document that may carry embedded text.
    Pdf,
    /// A raster image that can only be read through OCR.
    Image,
    /// Anything else. Never yields text.
    Unsupported,
}

impl DocumentKind {
    /// Classify a lower-cased extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "pdf" => DocumentKind::Pdf,
            "jpg" | "jpeg" | "png" | "tif" | "tiff" | "bmp" => DocumentKind::Image,
            _ => DocumentKind::Unsupported,
        }
    }
}

// ── Document ─────────────────────────────────────────────────────────────────

/// One input file of a batch.
///
/// Created by [`crate::scan_directory`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Full path to the file.
    pub path: PathBuf,

    /// The file name exactly as it appears in the directory listing.
    pub file_name: String,

    /// The extension, lower-cased, without the dot. Empty when the name has
    /// none.
    pub extension: String,
}

impl Document {
    /// Build a document for `file_name` inside `directory`.
    ///
    /// ```
    /// # use idcard_rename::Document;
    /// let doc = Document::new("/scans", "เอกสาร_1234567890123.PDF");
    /// assert_eq!(doc.extension, "pdf");
    /// ```
    pub fn new<P: AsRef<Path>>(directory: P, file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        Self {
            path: directory.as_ref().join(file_name),
            file_name: file_name.to_string(),
            extension,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_extension(&self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(Document::new("/d", "a.pdf").kind(), DocumentKind::Pdf);
        assert_eq!(Document::new("/d", "a.JPG").kind(), DocumentKind::Image);
        assert_eq!(Document::new("/d", "a.png").kind(), DocumentKind::Image);
        assert_eq!(Document::new("/d", "a.docx").kind(), DocumentKind::Unsupported);
        assert_eq!(Document::new("/d", "noext").kind(), DocumentKind::Unsupported);
    }

    #[test]
    fn extension_is_empty_without_dot() {
        let doc = Document::new("/d", "เอกสาร_1234567890123");
        assert_eq!(doc.extension, "");
        assert_eq!(doc.kind(), DocumentKind::Unsupported);
    }

    #[test]
    fn keeps_raw_file_name() {
        let doc = Document::new("/scans", "เอกสาร_X.Pdf");
        assert_eq!(doc.file_name, "เอกสาร_X.Pdf");
        assert_eq!(doc.path, PathBuf::from("/scans/เอกสาร_X.Pdf"));
        assert_eq!(doc.extension, "pdf");
    }
}
