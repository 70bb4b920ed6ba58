//! Output packaging

use crate::feature::FeatureId;
use serde::Serialize;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const PDF_EXTENSION: &str = "pdf";

/// Result of a successful run, held until the next run or feature switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedArtifact {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub file_name: String,
}

impl ProcessedArtifact {
    /// Wrap output bytes; `timestamp_ms` is Unix time in milliseconds
    pub fn package(bytes: Vec<u8>, feature: FeatureId, timestamp_ms: i64) -> Self {
        Self {
            bytes,
            media_type: PDF_MEDIA_TYPE,
            file_name: suggested_file_name(feature, timestamp_ms),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// `{prefix}_{timestamp}.pdf` for the given feature
pub fn suggested_file_name(feature: FeatureId, timestamp_ms: i64) -> String {
    let prefix = match feature {
        FeatureId::WordToPdf | FeatureId::ImageToPdf => "converted".to_string(),
        FeatureId::DeletePages => "cleaned".to_string(),
        FeatureId::FillForm => "filled_form".to_string(),
        other => format!("processed_{}", other),
    };
    format!("{}_{}.{}", prefix, timestamp_ms, PDF_EXTENSION)
}
