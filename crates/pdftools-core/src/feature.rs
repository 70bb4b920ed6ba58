//! Feature catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a PDF tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureId {
    Merge,
    Split,
    Compress,
    WordToPdf,
    ImageToPdf,
    DeletePages,
    FillForm,
}

impl FeatureId {
    pub const ALL: [FeatureId; 7] = [
        FeatureId::Merge,
        FeatureId::Split,
        FeatureId::Compress,
        FeatureId::WordToPdf,
        FeatureId::ImageToPdf,
        FeatureId::DeletePages,
        FeatureId::FillForm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureId::Merge => "merge",
            FeatureId::Split => "split",
            FeatureId::Compress => "compress",
            FeatureId::WordToPdf => "word-to-pdf",
            FeatureId::ImageToPdf => "image-to-pdf",
            FeatureId::DeletePages => "delete-pages",
            FeatureId::FillForm => "fill-form",
        }
    }

    /// Catalog entry for this feature
    pub fn feature(self) -> &'static Feature {
        FEATURES
            .iter()
            .find(|f| f.id == self)
            .unwrap_or(&FEATURES[0])
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureId::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub id: FeatureId,
    pub title: &'static str,
    pub description: &'static str,
}

pub static FEATURES: [Feature; 7] = [
    Feature {
        id: FeatureId::Merge,
        title: "Merge PDF",
        description: "Combine multiple PDF files into a single document",
    },
    Feature {
        id: FeatureId::Split,
        title: "Split PDF",
        description: "Extract selected pages or page ranges from a PDF",
    },
    Feature {
        id: FeatureId::Compress,
        title: "Compress PDF",
        description: "Reduce PDF file size while keeping quality",
    },
    Feature {
        id: FeatureId::WordToPdf,
        title: "Word to PDF",
        description: "Convert Word documents to PDF",
    },
    Feature {
        id: FeatureId::ImageToPdf,
        title: "Image to PDF",
        description: "Convert JPG and PNG images into a PDF document",
    },
    Feature {
        id: FeatureId::DeletePages,
        title: "Delete Pages",
        description: "Remove selected pages from a PDF",
    },
    Feature {
        id: FeatureId::FillForm,
        title: "Fill PDF Form",
        description: "Fill PDF forms digitally",
    },
];
