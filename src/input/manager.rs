//! Input manager for validating uploads and routing them to an extractor

use crate::config::LimitsConfig;
use crate::error::{Result, ResumeCheckerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, LegacyDocExtractor, PdfExtractor, TextExtractor, DOCX_INFLATION_FACTOR,
};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc"];

/// An uploaded resume: the original file name plus its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResumeCheckerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ResumeCheckerError::InvalidInput(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        Ok(Self { name, bytes })
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_file_name(&self.name)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// The per-format decoders, shared with blocking extraction tasks.
struct Extractors {
    pdf: PdfExtractor,
    docx: DocxExtractor,
    doc: LegacyDocExtractor,
}

impl Extractors {
    fn decode(&self, file_type: FileType, bytes: &[u8]) -> Result<String> {
        match file_type {
            FileType::Pdf => self.pdf.extract(bytes),
            FileType::Docx => self.docx.extract(bytes),
            FileType::Doc => self.doc.extract(bytes),
            FileType::Unknown => Err(ResumeCheckerError::UnsupportedFormat(
                "upload a PDF or DOCX file".to_string(),
            )),
        }
    }
}

pub struct InputManager {
    max_upload_bytes: u64,
    extractors: Arc<Extractors>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}

impl InputManager {
    pub fn new(limits: &LimitsConfig) -> Self {
        let max_xml_bytes = limits.max_upload_bytes.saturating_mul(DOCX_INFLATION_FACTOR);
        Self {
            max_upload_bytes: limits.max_upload_bytes,
            extractors: Arc::new(Extractors {
                pdf: PdfExtractor,
                docx: DocxExtractor::with_limit(max_xml_bytes),
                doc: LegacyDocExtractor::with_docx(DocxExtractor::with_limit(max_xml_bytes)),
            }),
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Upload checks done before any bytes are decoded.
    pub fn validate(&self, file: &ResumeFile) -> Result<FileType> {
        let file_type = file.file_type();
        if file_type == FileType::Unknown {
            return Err(ResumeCheckerError::UnsupportedFormat(format!(
                "{} (upload a PDF or DOCX file)",
                file.name
            )));
        }

        if file.size() > self.max_upload_bytes {
            return Err(ResumeCheckerError::FileTooLarge {
                size: file.size(),
                limit: self.max_upload_bytes,
            });
        }

        Ok(file_type)
    }

    /// Decode a resume into plain text on the blocking pool. Only the
    /// extension is checked here; size limits belong to [`InputManager::validate`].
    pub async fn extract(&self, file: &ResumeFile) -> Result<String> {
        let file_type = file.file_type();
        match file_type {
            FileType::Pdf => info!("Extracting text from PDF: {}", file.name),
            FileType::Docx => info!("Extracting text from DOCX: {}", file.name),
            FileType::Doc => info!("Extracting text from DOC: {}", file.name),
            FileType::Unknown => {
                return Err(ResumeCheckerError::UnsupportedFormat(format!(
                    "{} (upload a PDF or DOCX file)",
                    file.name
                )))
            }
        }

        let extractors = Arc::clone(&self.extractors);
        let bytes = file.bytes.clone();
        tokio::task::spawn_blocking(move || extractors.decode(file_type, &bytes))
            .await
            .map_err(|e| ResumeCheckerError::CorruptFile(format!("Decoder task failed: {}", e)))?
    }

    /// Extraction bounded by a caller-imposed timeout. On expiry the decoder
    /// is left to finish in the background and its result is discarded.
    pub async fn extract_with_timeout(&self, file: &ResumeFile, limit: Duration) -> Result<String> {
        match tokio::time::timeout(limit, self.extract(file)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Extraction of {} exceeded {:?}", file.name, limit);
                Err(ResumeCheckerError::ExtractionFailed(format!(
                    "Timed out after {:?} while reading {}",
                    limit,
                    file.name
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let manager = InputManager::default();
        let file = ResumeFile::new("resume.txt", b"hello".to_vec());
        let err = manager.validate(&file).unwrap_err();
        assert!(matches!(err, ResumeCheckerError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_upload() {
        let limits = LimitsConfig {
            max_upload_bytes: 4,
            extraction_timeout_secs: 1,
        };
        let manager = InputManager::new(&limits);
        let file = ResumeFile::new("resume.pdf", vec![0u8; 5]);
        let err = manager.validate(&file).unwrap_err();
        assert!(matches!(err, ResumeCheckerError::FileTooLarge { size: 5, limit: 4 }));
    }

    #[test]
    fn test_validate_accepts_doc() {
        let manager = InputManager::default();
        let file = ResumeFile::new("Resume.DOC", vec![1, 2, 3]);
        assert_eq!(manager.validate(&file).unwrap(), FileType::Doc);
    }

    #[tokio::test]
    async fn test_extract_unsupported_without_reading_bytes() {
        let manager = InputManager::default();
        let file = ResumeFile::new("resume.txt", Vec::new());
        let err = manager.extract(&file).await.unwrap_err();
        assert!(matches!(err, ResumeCheckerError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_extract_with_timeout_passes_result_through() {
        let manager = InputManager::default();
        let file = ResumeFile::new("resume.docx", b"not a zip".to_vec());
        let err = manager
            .extract_with_timeout(&file, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeCheckerError::CorruptFile(_)));
    }
}
