//! Raw text extraction from supported document formats.
//!
//! Format is chosen from the file extension; each format knows how to turn
//! the file bytes into plain text.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file type '{0}', use .txt, .pdf or .docx")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("text file is not valid UTF-8")]
    InvalidUtf8,
    #[error("PDF is encrypted")]
    EncryptedPdf,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
}

/// Main body part of a .docx package.
const DOCX_BODY: &str = "word/document.xml";

impl DocumentFormat {
    /// Pick a format from a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Result<Self, ExtractError> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            other => Err(ExtractError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ExtractError::UnsupportedFormat(String::new()))?;
        Self::from_extension(extension)
    }

    /// Convert file bytes into plain text.
    pub fn extract(self, bytes: &[u8]) -> Result<String, ExtractError> {
        match self {
            Self::PlainText => extract_plain_text(bytes),
            Self::Pdf => extract_pdf(bytes),
            Self::Docx => extract_docx(bytes),
        }
    }
}

/// Read a file from disk and extract its text.
pub fn extract_file(path: &Path) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    format.extract(&bytes)
}

/// File name component used as the document identifier.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ExtractError::InvalidUtf8)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

/// Concatenate the text of every page, in page order.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = lopdf::Document::load_mem(bytes)?;
    if document.is_encrypted() {
        return Err(ExtractError::EncryptedPdf);
    }

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number])?;
        text.push_str(&page_text);
    }
    Ok(text)
}

/// Paragraph texts of the document body, each trimmed, joined by newlines.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;

    let paragraphs = docx_paragraphs(&xml)?;
    Ok(paragraphs.join("\n"))
}

fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" | b"w:cr" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    in_paragraph = false;
                    paragraphs.push(current.trim().to_string());
                    current.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
