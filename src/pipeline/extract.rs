//! Text extraction from uploaded files.
//! Supports: TXT, PDF

use std::io::{Read, Seek, SeekFrom};

use tracing::{info, warn};

use crate::error::ExtractError;

/// Upload formats the extractor understands, keyed on filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Pdf,
}

impl FileKind {
    /// Suffix match is case-sensitive: `notes.TXT` is not a text upload.
    pub fn from_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".txt") {
            Some(Self::Text)
        } else if file_name.ends_with(".pdf") {
            Some(Self::Pdf)
        } else {
            None
        }
    }
}

/// Extract text content from a named byte stream.
///
/// The stream is rewound to its start first, so a reader that was already
/// partially consumed still yields the whole file.
pub fn extract_text<R: Read + Seek>(file_name: &str, reader: &mut R) -> Result<String, ExtractError> {
    let Some(kind) = FileKind::from_name(file_name) else {
        warn!(file_name = file_name, "Rejected upload with unsupported format");
        return Err(ExtractError::UnsupportedFormat);
    };

    reader.seek(SeekFrom::Start(0))?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    info!(file_name = file_name, kind = ?kind, bytes = data.len(), "Extracting text from upload");

    match kind {
        FileKind::Text => Ok(String::from_utf8(data)?),
        FileKind::Pdf => extract_pdf_text(&data),
    }
}

/// Extract text from a PDF, page by page in document order.
fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractError> {
    match pdf_extract::extract_text_from_mem_by_pages(data) {
        Ok(pages) => {
            let text = join_pages(pages);
            info!("PDF extraction successful: {} characters", text.len());
            Ok(text)
        }
        Err(e) => {
            warn!("PDF extraction failed: {}", e);
            Err(ExtractError::Pdf(e.to_string()))
        }
    }
}

/// Each page with text is followed by a newline; empty pages are skipped.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages
        .into_iter()
        .filter(|page| !page.is_empty())
        .fold(String::new(), |mut acc, page| {
            acc.push_str(&page);
            acc.push('\n');
            acc
        })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a PDF with one page per entry, each showing its text in
    /// Helvetica. An empty entry gives a page with no text at all.
    pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations }.encode().unwrap();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
