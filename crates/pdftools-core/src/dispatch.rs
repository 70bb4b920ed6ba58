//! Feature dispatch table
//!
//! Maps a feature id to what the upload form accepts, the prompt shown above
//! it, and the settings the tool reads. Unknown ids get a generic profile
//! that accepts every supported input but has no operation behind it.

use crate::feature::FeatureId;
use serde::Serialize;

const PDF: &[&str] = &[".pdf"];
const WORD: &[&str] = &[".doc", ".docx"];
const IMAGES: &[&str] = &[".jpg", ".jpeg", ".png"];
const ANY: &[&str] = &[".pdf", ".doc", ".docx", ".jpg", ".jpeg", ".png"];

pub const GENERIC_PROMPT: &str = "Upload your files";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text {
        placeholder: &'static str,
    },
    Select {
        options: &'static [&'static str],
        default: &'static str,
    },
    /// Free-form JSON object
    Json {
        placeholder: &'static str,
    },
}

/// One input of a tool's settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingField {
    /// Key in `ProcessSettings` the field writes to
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub help: Option<&'static str>,
}

const SPLIT_SETTINGS: &[SettingField] = &[
    SettingField {
        key: "splitMethod",
        label: "Split method",
        kind: FieldKind::Select {
            options: &["range"],
            default: "range",
        },
        help: None,
    },
    SettingField {
        key: "pageRange",
        label: "Page range (leave empty to extract every page)",
        kind: FieldKind::Text {
            placeholder: "1-3, 5-7",
        },
        help: Some("Example: 1-3 (pages 1 to 3), 5 (page 5 only), 1-3, 5, 7-9 (several ranges)"),
    },
];

const COMPRESS_SETTINGS: &[SettingField] = &[SettingField {
    key: "compressionLevel",
    label: "Compression level",
    kind: FieldKind::Select {
        options: &["low", "medium", "high"],
        default: "medium",
    },
    help: None,
}];

const DELETE_SETTINGS: &[SettingField] = &[SettingField {
    key: "pagesToDelete",
    label: "Pages to delete",
    kind: FieldKind::Text {
        placeholder: "1, 3, 5-7",
    },
    help: Some("Separate page numbers with commas. Use a hyphen for a range."),
}];

const FILL_FORM_SETTINGS: &[SettingField] = &[
    SettingField {
        key: "formDataText",
        label: "Form data",
        kind: FieldKind::Json {
            placeholder: "{\"Name\": \"John Doe\", \"Email\": \"john@example.com\"}",
        },
        help: Some("Enter the form data as a JSON object of key-value pairs."),
    },
    SettingField {
        key: "formPosition",
        label: "Form position",
        kind: FieldKind::Select {
            options: &["top", "bottom", "center"],
            default: "top",
        },
        help: None,
    },
];

/// What the upload step and settings form look like for a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProfile {
    /// `None` for the generic fallback, which has no operation
    pub feature: Option<FeatureId>,
    pub accepted_extensions: &'static [&'static str],
    pub upload_prompt: &'static str,
    pub settings_schema: Option<&'static [SettingField]>,
}

impl FeatureProfile {
    pub fn for_feature(id: FeatureId) -> Self {
        let (accepted_extensions, upload_prompt, settings_schema) = match id {
            FeatureId::Merge => (PDF, "Upload the PDF files to merge", None),
            FeatureId::Split => (PDF, "Upload the PDF file to split", Some(SPLIT_SETTINGS)),
            FeatureId::Compress => (
                PDF,
                "Upload the PDF file to compress",
                Some(COMPRESS_SETTINGS),
            ),
            FeatureId::WordToPdf => (WORD, "Upload the Word file to convert to PDF", None),
            FeatureId::ImageToPdf => (IMAGES, "Upload the images to convert to PDF", None),
            FeatureId::DeletePages => (
                PDF,
                "Upload the PDF file to edit",
                Some(DELETE_SETTINGS),
            ),
            FeatureId::FillForm => (
                PDF,
                "Upload the PDF form to fill",
                Some(FILL_FORM_SETTINGS),
            ),
        };

        Self {
            feature: Some(id),
            accepted_extensions,
            upload_prompt,
            settings_schema,
        }
    }

    pub fn generic() -> Self {
        Self {
            feature: None,
            accepted_extensions: ANY,
            upload_prompt: GENERIC_PROMPT,
            settings_schema: None,
        }
    }

    /// Whether a file name carries one of the accepted extensions
    pub fn accepts(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.accepted_extensions
            .iter()
            .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
    }
}

/// Look up the profile for a feature id, falling back to the generic one
pub fn profile(id: &str) -> FeatureProfile {
    id.parse::<FeatureId>()
        .map(FeatureProfile::for_feature)
        .unwrap_or_else(|_| FeatureProfile::generic())
}
