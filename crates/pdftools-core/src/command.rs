use crate::artifact::ProcessedArtifact;
use crate::feature::FeatureId;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// Serializable outcome of a run, for hosts that want JSON
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub success: bool,
    pub feature: FeatureId,
    /// Base64-encoded PDF data
    pub data: Option<String>,
    pub file_name: Option<String>,
    pub media_type: Option<&'static str>,
    pub error: Option<String>,
    pub metrics: Option<ProcessMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
    pub processing_time_ms: u64,
}

impl ProcessResult {
    pub fn succeeded(
        feature: FeatureId,
        artifact: &ProcessedArtifact,
        metrics: ProcessMetrics,
    ) -> Self {
        Self {
            success: true,
            feature,
            data: Some(STANDARD.encode(&artifact.bytes)),
            file_name: Some(artifact.file_name.clone()),
            media_type: Some(artifact.media_type),
            error: None,
            metrics: Some(metrics),
        }
    }

    pub fn failed(feature: FeatureId, error: impl ToString) -> Self {
        Self {
            success: false,
            feature,
            data: None,
            file_name: None,
            media_type: None,
            error: Some(error.to_string()),
            metrics: None,
        }
    }
}
