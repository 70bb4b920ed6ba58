use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PdfToolsError>;

/// File-count requirement of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCount {
    Exactly(usize),
    AtLeast(usize),
}

impl FileCount {
    pub fn is_satisfied_by(self, actual: usize) -> bool {
        match self {
            FileCount::Exactly(n) => actual == n,
            FileCount::AtLeast(n) => actual >= n,
        }
    }
}

impl fmt::Display for FileCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileCount::Exactly(1) => write!(f, "exactly 1 file"),
            FileCount::Exactly(n) => write!(f, "exactly {} files", n),
            FileCount::AtLeast(1) => write!(f, "at least 1 file"),
            FileCount::AtLeast(n) => write!(f, "at least {} files", n),
        }
    }
}

#[derive(Error, Debug)]
pub enum PdfToolsError {
    #[error("{feature} requires {required}, got {actual}")]
    Precondition {
        feature: String,
        required: FileCount,
        actual: usize,
    },

    #[error("No operation is available for feature '{0}'")]
    UnknownFeature(String),

    #[error("Invalid page range: {token}. Page numbers must be between 1 and {page_count}")]
    InvalidRange { token: String, page_count: u32 },

    #[error("Invalid page number: {token}. Page number must be between 1 and {page_count}")]
    InvalidPageNumber { token: String, page_count: u32 },

    #[error("No valid pages selected. The document has {page_count} pages; use numbers between 1 and {page_count}")]
    EmptySelection { page_count: u32 },

    #[error("Cannot delete every page: at least one page must remain")]
    AllPagesRemoved,

    #[error("{file} has unsupported format '{media_type}'. Only PNG and JPEG images are supported")]
    UnsupportedFormat { file: String, media_type: String },

    #[error("{file} could not be processed: {source}")]
    FileFailed {
        file: String,
        #[source]
        source: Box<PdfToolsError>,
    },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Image decoding failed: {0}")]
    Image(String),

    #[error("PDF operation failed: {0}")]
    Processing(String),
}

impl PdfToolsError {
    /// Attach the offending file name to a failure inside a batch
    pub fn in_file(self, file: &str) -> Self {
        PdfToolsError::FileFailed {
            file: file.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<lopdf::Error> for PdfToolsError {
    fn from(e: lopdf::Error) -> Self {
        PdfToolsError::Processing(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_count_display() {
        assert_eq!(FileCount::Exactly(1).to_string(), "exactly 1 file");
        assert_eq!(FileCount::AtLeast(2).to_string(), "at least 2 files");
    }

    #[test]
    fn test_precondition_names_counts() {
        let err = PdfToolsError::Precondition {
            feature: "merge".into(),
            required: FileCount::AtLeast(2),
            actual: 1,
        };
        assert_eq!(err.to_string(), "merge requires at least 2 files, got 1");
    }

    #[test]
    fn test_file_failed_names_file_and_cause() {
        let err = PdfToolsError::Processing("bad xref".into()).in_file("a.pdf");
        let msg = err.to_string();
        assert!(msg.contains("a.pdf"));
        assert!(msg.contains("bad xref"));
    }
}
