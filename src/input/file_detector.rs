//! File type detection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Doc,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "doc" => FileType::Doc,
            _ => FileType::Unknown,
        }
    }

    /// Detect from a bare file name such as `Resume.PDF`.
    pub fn from_file_name(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => FileType::Unknown,
        }
    }

    /// Formats the ATS rubric gives full credit to.
    pub fn is_ats_preferred(&self) -> bool {
        matches!(self, FileType::Pdf | FileType::Docx)
    }
}
