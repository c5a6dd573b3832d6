use crate::extraction_engine::TextExtractor;
use crate::{Document, DocumentKind, RenameError, Result};

/// Reads the text layer a PDF already carries.
///
/// Fast and free of recognition errors, but scanned documents usually have no
/// text layer at all, in which case the result is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredExtractor;

impl StructuredExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every page of a PDF held in memory.
    pub fn extract_from_bytes(&self, data: &[u8]) -> Result<String> {
        let pdf = lopdf::Document::load_mem(data)?;
        Self::extract_pages(&pdf)
    }

    fn extract_pages(pdf: &lopdf::Document) -> Result<String> {
        let page_numbers: Vec<u32> = pdf.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Ok(String::new());
        }
        Ok(pdf.extract_text(&page_numbers)?)
    }
}

impl TextExtractor for StructuredExtractor {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn supports(&self, document: &Document) -> bool {
        document.kind() == DocumentKind::Pdf
    }

    fn extract(&self, document: &Document) -> Result<String> {
        if !self.supports(document) {
            return Err(RenameError::UnsupportedFormat(document.extension.clone()));
        }
        self.extract_from_bytes(&std::fs::read(&document.path)?)
    }
}

/// A one-page PDF whose text layer reads `text`.
#[cfg(test)]
pub(crate) fn pdf_with_text(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();
    let font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes).unwrap();
    bytes
}
