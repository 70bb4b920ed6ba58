//! Uploaded files and upload limits

use crate::dispatch::FeatureProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

pub const DEFAULT_MAX_FILES: usize = 10;
pub const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// A file handed to a tool, already read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    /// Media type reported by the host, if any
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            bytes,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        self.media_type = (!media_type.trim().is_empty()).then_some(media_type);
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercase extension including the dot (".pdf"), if the name has one
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(format!(".{}", ext.to_ascii_lowercase()))
    }

    /// The reported media type, or one inferred from the extension
    pub fn declared_media_type(&self) -> String {
        if let Some(media_type) = &self.media_type {
            return media_type.clone();
        }
        let inferred = match self.extension().as_deref() {
            Some(".pdf") => "application/pdf",
            Some(".doc") => "application/msword",
            Some(".docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some(".jpg") | Some(".jpeg") => "image/jpeg",
            Some(".png") => "image/png",
            _ => "application/octet-stream",
        };
        inferred.to_string()
    }
}

/// Limits applied when files are added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Why a file was not added
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    InvalidType { file: String, accepted: String },
    TooLarge { file: String, size: usize, limit: usize },
    TooMany { file: String, limit: usize },
}

impl UploadRejection {
    pub fn file(&self) -> &str {
        match self {
            UploadRejection::InvalidType { file, .. }
            | UploadRejection::TooLarge { file, .. }
            | UploadRejection::TooMany { file, .. } => file,
        }
    }
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadRejection::InvalidType { file, accepted } => {
                write!(f, "{}: invalid file type. Accepted types: {}", file, accepted)
            }
            UploadRejection::TooLarge { file, size, limit } => write!(
                f,
                "{}: file is too large ({}). Maximum size is {}",
                file,
                format_size(*size),
                format_size(*limit)
            ),
            UploadRejection::TooMany { file, limit } => {
                write!(f, "{}: too many files. At most {} files are allowed", file, limit)
            }
        }
    }
}

fn format_size(bytes: usize) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes as f64 >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

/// Ordered set of files for the active tool
#[derive(Debug, Clone, Default)]
pub struct UploadedFileSet {
    files: Vec<InputFile>,
}

impl UploadedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the acceptable files in order; each rejected file is reported
    /// and the rest of the batch still goes in
    pub fn add(
        &mut self,
        files: impl IntoIterator<Item = InputFile>,
        profile: &FeatureProfile,
        limits: &UploadLimits,
    ) -> Vec<UploadRejection> {
        let mut rejections = Vec::new();

        for file in files {
            let rejection = if !profile.accepts(&file.name) {
                Some(UploadRejection::InvalidType {
                    file: file.name.clone(),
                    accepted: profile.accepted_extensions.join(", "),
                })
            } else if file.size() > limits.max_file_size {
                Some(UploadRejection::TooLarge {
                    file: file.name.clone(),
                    size: file.size(),
                    limit: limits.max_file_size,
                })
            } else if self.files.len() >= limits.max_files {
                Some(UploadRejection::TooMany {
                    file: file.name.clone(),
                    limit: limits.max_files,
                })
            } else {
                None
            };

            match rejection {
                Some(rejection) => {
                    warn!(%rejection, "upload rejected");
                    rejections.push(rejection);
                }
                None => self.files.push(file),
            }
        }

        rejections
    }

    /// Remove the file at `index`; out-of-range indices are ignored
    pub fn remove(&mut self, index: usize) -> Option<InputFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn as_slice(&self) -> &[InputFile] {
        &self.files
    }
}
