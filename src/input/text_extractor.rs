//! Text extraction from uploaded resume bytes

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::error::{Result, ResumeCheckerError};
use log::{debug, warn};
use regex::Regex;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const OLE_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Decodes one document format. Implementations are synchronous and CPU bound;
/// [`crate::input::InputManager`] runs them on the blocking pool.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed streams instead of returning an error
        let decoded = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| {
                ResumeCheckerError::CorruptFile("PDF decoder aborted on malformed input".to_string())
            })?
            .map_err(|e| {
                ResumeCheckerError::CorruptFile(format!("Failed to parse PDF file: {}", e))
            })?;

        let text = tidy_lines(&decoded);
        if text.is_empty() {
            return Err(ResumeCheckerError::ExtractionFailed(
                "No text could be extracted from the PDF. The file might be image-based; export a text-based PDF instead."
                    .to_string(),
            ));
        }

        debug!("Extracted {} characters from PDF", text.len());
        Ok(text)
    }
}

/// Normalise line endings and strip trailing whitespace from decoded text.
/// pdf-extract already emits pages in order, each starting on a new line.
pub fn tidy_lines(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Uncompressed `word/document.xml` may be this many times the upload limit.
pub const DOCX_INFLATION_FACTOR: u64 = 10;

pub struct DocxExtractor {
    max_xml_bytes: u64,
    hidden_runs: Regex,
    paragraph_end: Regex,
    empty_paragraph: Regex,
    line_break: Regex,
    tab: Regex,
    tag: Regex,
    numeric_entity: Regex,
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxExtractor {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_UPLOAD_BYTES.saturating_mul(DOCX_INFLATION_FACTOR))
    }

    /// Archives whose document body inflates beyond `max_xml_bytes` are rejected.
    pub fn with_limit(max_xml_bytes: u64) -> Self {
        Self {
            max_xml_bytes,
            hidden_runs: Regex::new(
                r"(?s)<w:instrText\b[^>]*>.*?</w:instrText>|<w:delText\b[^>]*>.*?</w:delText>",
            )
            .expect("Invalid field code regex"),
            paragraph_end: Regex::new(r"</w:p>").expect("Invalid paragraph regex"),
            empty_paragraph: Regex::new(r"<w:p(?:\s[^>]*)?/>").expect("Invalid empty paragraph regex"),
            line_break: Regex::new(r"<w:(?:br|cr)\b[^>]*/>").expect("Invalid line break regex"),
            tab: Regex::new(r"<w:tab\b[^>]*/>").expect("Invalid tab regex"),
            tag: Regex::new(r"<[^>]*>").expect("Invalid tag regex"),
            numeric_entity: Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("Invalid entity regex"),
        }
    }

    /// Reduce WordprocessingML to paragraph text, one paragraph per line.
    pub fn xml_to_text(&self, xml: &str) -> String {
        // Field codes and deleted revisions are not visible paragraph text.
        let text = self.hidden_runs.replace_all(xml, "");
        let text = self.paragraph_end.replace_all(&text, "\n");
        let text = self.empty_paragraph.replace_all(&text, "\n");
        let text = self.line_break.replace_all(&text, "\n");
        let text = self.tab.replace_all(&text, "\t");
        let text = self.tag.replace_all(&text, "");

        let text = self.numeric_entity.replace_all(&text, |caps: &regex::Captures| {
            let code = &caps[1];
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        });

        let text = text
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&");

        text.lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            ResumeCheckerError::CorruptFile(format!("Not a valid DOCX archive: {}", e))
        })?;

        let body = archive
            .by_name("word/document.xml")
            .map_err(|e| ResumeCheckerError::CorruptFile(format!("DOCX has no document body: {}", e)))?;

        if body.size() > self.max_xml_bytes {
            return Err(ResumeCheckerError::CorruptFile(format!(
                "DOCX body inflates to {} bytes (limit {})",
                body.size(),
                self.max_xml_bytes
            )));
        }

        // The declared size can lie, so the read itself is bounded too.
        let mut xml = String::new();
        body.take(self.max_xml_bytes + 1)
            .read_to_string(&mut xml)
            .map_err(|e| ResumeCheckerError::CorruptFile(format!("Failed to read DOCX body: {}", e)))?;
        if xml.len() as u64 > self.max_xml_bytes {
            return Err(ResumeCheckerError::CorruptFile(format!(
                "DOCX body exceeds {} bytes",
                self.max_xml_bytes
            )));
        }

        let text = self.xml_to_text(&xml);
        debug!("Extracted {} characters from DOCX", text.len());
        Ok(text)
    }
}

/// Best effort for `.doc`: files that are really OOXML are read as DOCX,
/// binary Word 97-2003 documents are rejected with a re-export hint.
pub struct LegacyDocExtractor {
    docx: DocxExtractor,
}

impl Default for LegacyDocExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyDocExtractor {
    pub fn new() -> Self {
        Self::with_docx(DocxExtractor::new())
    }

    pub fn with_docx(docx: DocxExtractor) -> Self {
        Self { docx }
    }
}

impl TextExtractor for LegacyDocExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        if bytes.starts_with(ZIP_SIGNATURE) {
            debug!(".doc upload is an OOXML archive, reading as DOCX");
            return self.docx.extract(bytes);
        }

        if bytes.starts_with(OLE_SIGNATURE) {
            warn!("Binary Word 97-2003 document cannot be read");
            return Err(ResumeCheckerError::ExtractionFailed(
                "Legacy .doc files are not supported. Save the resume as DOCX or PDF and try again."
                    .to_string(),
            ));
        }

        Err(ResumeCheckerError::CorruptFile(
            "File is neither a Word document nor an OOXML archive".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_tidy_lines() {
        let raw = "  Jane Doe\r\nEngineer   \n\nPage two  \n";
        assert_eq!(tidy_lines(raw), "Jane Doe\nEngineer\n\nPage two");
        assert_eq!(tidy_lines(" \n \r\n "), "");
    }

    #[test]
    fn test_docx_xml_to_text() {
        let extractor = DocxExtractor::new();
        let xml = r#"<w:document><w:body><w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>2020&#8211;2021</w:t></w:r></w:p></w:body></w:document>"#;

        let text = extractor.xml_to_text(xml);
        assert_eq!(text, "Jane Doe\n\nR&D\t2020\u{2013}2021");
    }

    #[test]
    fn test_docx_drops_field_codes_and_deleted_text() {
        let extractor = DocxExtractor::new();
        let xml = r#"<w:p><w:r><w:instrText xml:space="preserve"> HYPERLINK "https://example.com" </w:instrText></w:r><w:r><w:t>Portfolio</w:t></w:r><w:del><w:r><w:delText>old title</w:delText></w:r></w:del></w:p>"#;

        assert_eq!(extractor.xml_to_text(xml), "Portfolio");
    }

    #[test]
    fn test_docx_body_over_limit_is_corrupt() {
        let body = format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", "a".repeat(4096));
        let bytes = docx_with_body(&body);

        let err = DocxExtractor::with_limit(1024).extract(&bytes).unwrap_err();
        assert!(matches!(err, ResumeCheckerError::CorruptFile(_)));

        let text = DocxExtractor::with_limit(8192).extract(&bytes).unwrap();
        assert_eq!(text.len(), 4096);
    }

    #[test]
    fn test_pdf_garbage_is_corrupt() {
        let err = PdfExtractor.extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ResumeCheckerError::CorruptFile(_)));
    }

    #[test]
    fn test_docx_garbage_is_corrupt() {
        let err = DocxExtractor::new().extract(b"not a zip").unwrap_err();
        assert!(matches!(err, ResumeCheckerError::CorruptFile(_)));
    }

    #[test]
    fn test_binary_doc_is_rejected() {
        let mut bytes = OLE_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        let err = LegacyDocExtractor::new().extract(&bytes).unwrap_err();
        assert!(matches!(err, ResumeCheckerError::ExtractionFailed(_)));
    }

    #[test]
    fn test_ooxml_doc_reads_as_docx() {
        let bytes = docx_with_body("<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>");
        assert_eq!(LegacyDocExtractor::new().extract(&bytes).unwrap(), "Jane Doe");
    }
}
