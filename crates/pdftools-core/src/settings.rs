//! Tool settings
//!
//! `ProcessSettings` is the loose record the settings form writes into.
//! Before a run it is validated into a `FeatureSettings` variant carrying
//! only what the selected tool reads.

use crate::engine::CompressionLevel;
use crate::error::{PdfToolsError, Result};
use crate::feature::FeatureId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Where the filled-in form block starts on the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPosition {
    #[default]
    Top,
    Center,
    Bottom,
}

impl FormPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            FormPosition::Top => "top",
            FormPosition::Center => "center",
            FormPosition::Bottom => "bottom",
        }
    }
}

impl fmt::Display for FormPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormPosition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(FormPosition::Top),
            "center" => Ok(FormPosition::Center),
            "bottom" => Ok(FormPosition::Bottom),
            other => Err(format!("Unknown form position: {}", other)),
        }
    }
}

/// Ordered form fields with their values rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self(fields)
    }

    /// Strings are used as-is; other JSON values keep their JSON text
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let fields = map
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        Self(fields)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Raw settings as entered; only the fields of the active tool are read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessSettings {
    pub split_method: Option<String>,
    pub page_range: Option<String>,
    pub compression_level: Option<String>,
    pub pages_to_delete: Option<String>,
    pub form_data_text: Option<String>,
    pub form_position: Option<String>,
    pub form_data: Option<Value>,
}

impl ProcessSettings {
    /// Store the form JSON as typed; `form_data` only changes when the text
    /// parses as a JSON object, so a half-typed edit keeps the last good value
    pub fn set_form_data_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        match serde_json::from_str::<Value>(&text) {
            Ok(value @ Value::Object(_)) => self.form_data = Some(value),
            Ok(_) => debug!("form data is not an object, keeping previous value"),
            Err(e) => debug!(error = %e, "form data is not valid JSON yet, keeping previous value"),
        }
        self.form_data_text = Some(text);
    }

    /// Validate the fields the given tool reads
    pub fn resolve(&self, feature: FeatureId) -> Result<FeatureSettings> {
        let settings = match feature {
            FeatureId::Merge => FeatureSettings::Merge,
            FeatureId::WordToPdf => FeatureSettings::WordToPdf,
            FeatureId::ImageToPdf => FeatureSettings::ImageToPdf,
            FeatureId::Split => {
                match self.split_method.as_deref().map(str::trim) {
                    None | Some("") | Some("range") => {}
                    Some(other) => {
                        return Err(PdfToolsError::InvalidSettings(format!(
                            "Unsupported split method: {}",
                            other
                        )))
                    }
                }
                FeatureSettings::Split {
                    range: self.page_range.clone().unwrap_or_default(),
                }
            }
            FeatureId::Compress => FeatureSettings::Compress {
                level: parse_or_default(self.compression_level.as_deref())?,
            },
            FeatureId::DeletePages => FeatureSettings::DeletePages {
                pages: self.pages_to_delete.clone().unwrap_or_default(),
            },
            FeatureId::FillForm => {
                let fields = match &self.form_data {
                    None | Some(Value::Null) => FormFields::default(),
                    Some(Value::Object(map)) => FormFields::from_map(map),
                    Some(_) => {
                        return Err(PdfToolsError::InvalidSettings(
                            "Form data must be a JSON object".into(),
                        ))
                    }
                };
                FeatureSettings::FillForm {
                    fields,
                    position: parse_or_default(self.form_position.as_deref())?,
                }
            }
        };
        Ok(settings)
    }
}

fn parse_or_default<T>(raw: Option<&str>) -> Result<T>
where
    T: FromStr<Err = String> + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse().map_err(PdfToolsError::InvalidSettings),
    }
}

/// Validated settings for one tool
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureSettings {
    Merge,
    Split { range: String },
    Compress { level: CompressionLevel },
    WordToPdf,
    ImageToPdf,
    DeletePages { pages: String },
    FillForm { fields: FormFields, position: FormPosition },
}

impl FeatureSettings {
    pub fn feature(&self) -> FeatureId {
        match self {
            FeatureSettings::Merge => FeatureId::Merge,
            FeatureSettings::Split { .. } => FeatureId::Split,
            FeatureSettings::Compress { .. } => FeatureId::Compress,
            FeatureSettings::WordToPdf => FeatureId::WordToPdf,
            FeatureSettings::ImageToPdf => FeatureId::ImageToPdf,
            FeatureSettings::DeletePages { .. } => FeatureId::DeletePages,
            FeatureSettings::FillForm { .. } => FeatureId::FillForm,
        }
    }
}
