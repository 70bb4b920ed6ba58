//! Stateful tool session for the browser
//!
//! Wraps the core session so the page only forwards user actions and reads
//! results back.

use pdftools_core::{
    FeatureProfile, InputFile, LopdfEngine, ProcessMetrics, ProcessSettings, Session,
    UploadLimits,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct PdfToolsSession {
    inner: Session<LopdfEngine>,
    progress_callback: Option<js_sys::Function>,
}

/// What `execute` hands back to JavaScript
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteSummary {
    file_name: String,
    media_type: &'static str,
    metrics: Option<ProcessMetrics>,
}

impl Default for PdfToolsSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PdfToolsSession {
    /// Create a session with the default upload limits
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_limits_internal(UploadLimits::default())
    }

    /// Create a session with custom upload limits
    #[wasm_bindgen(js_name = withLimits)]
    pub fn with_limits(max_files: usize, max_file_size: usize) -> Self {
        Self::with_limits_internal(UploadLimits {
            max_files,
            max_file_size,
        })
    }

    /// Callback signature: (current: number, total: number, message: string) => void
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: js_sys::Function) {
        self.progress_callback = Some(callback);
    }

    /// Switch tools and return the upload profile for the new one
    #[wasm_bindgen(js_name = selectFeature)]
    pub fn select_feature(&mut self, id: &str) -> Result<JsValue, JsValue> {
        let profile = self.select_feature_internal(id);
        to_js(&profile)
    }

    /// Add one file; a rejected file comes back as an error naming the limit
    #[wasm_bindgen(js_name = addFile)]
    pub fn add_file(
        &mut self,
        name: &str,
        media_type: Option<String>,
        bytes: &[u8],
    ) -> Result<(), JsValue> {
        self.add_file_internal(name, media_type, bytes)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = removeFile)]
    pub fn remove_file(&mut self, index: usize) -> Result<(), JsValue> {
        self.remove_file_internal(index)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = getFileNames)]
    pub fn file_names(&self) -> Vec<String> {
        self.inner.files().iter().map(|f| f.name.clone()).collect()
    }

    #[wasm_bindgen(js_name = getFileCount)]
    pub fn file_count(&self) -> usize {
        self.inner.files().len()
    }

    /// Replace the settings with a `ProcessSettings`-shaped object
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings: ProcessSettings = serde_wasm_bindgen::from_value(settings)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?;
        self.set_settings_internal(settings);
        Ok(())
    }

    /// Feed the raw text of the form-data box; bad JSON keeps the last good value
    #[wasm_bindgen(js_name = updateFormData)]
    pub fn update_form_data(&mut self, text: &str) {
        self.inner.settings_mut().set_form_data_text(text);
    }

    #[wasm_bindgen(js_name = canExecute)]
    pub fn can_execute(&self) -> bool {
        self.inner.can_execute()
    }

    /// Run the selected tool; returns `{fileName, mediaType, metrics}`
    pub fn execute(&mut self) -> Result<JsValue, JsValue> {
        self.report_progress(0, 100, "Processing...");
        let summary = self
            .execute_internal()
            .map_err(|e| JsValue::from_str(&e))?;
        self.report_progress(100, 100, "Complete");
        to_js(&summary)
    }

    #[wasm_bindgen(js_name = artifactBytes)]
    pub fn artifact_bytes(&self) -> Option<Vec<u8>> {
        self.inner.artifact().map(|a| a.bytes.clone())
    }

    #[wasm_bindgen(js_name = artifactFileName)]
    pub fn artifact_file_name(&self) -> Option<String> {
        self.inner.artifact().map(|a| a.file_name.clone())
    }

    #[wasm_bindgen(js_name = artifactMediaType)]
    pub fn artifact_media_type(&self) -> Option<String> {
        self.inner.artifact().map(|a| a.media_type.to_string())
    }
}

impl PdfToolsSession {
    fn with_limits_internal(limits: UploadLimits) -> Self {
        Self {
            inner: Session::new(LopdfEngine, limits),
            progress_callback: None,
        }
    }

    fn select_feature_internal(&mut self, id: &str) -> FeatureProfile {
        *self.inner.select_feature(id)
    }

    fn add_file_internal(
        &mut self,
        name: &str,
        media_type: Option<String>,
        bytes: &[u8],
    ) -> Result<(), String> {
        let mut file = InputFile::new(name, bytes.to_vec());
        if let Some(media_type) = media_type {
            file = file.with_media_type(media_type);
        }

        match self.inner.add_files([file]).into_iter().next() {
            Some(rejection) => Err(rejection.to_string()),
            None => Ok(()),
        }
    }

    fn remove_file_internal(&mut self, index: usize) -> Result<(), String> {
        self.inner
            .remove_file(index)
            .map(|_| ())
            .ok_or_else(|| "File index out of bounds".to_string())
    }

    /// Form text arriving with the settings goes through the tolerant parser
    fn set_settings_internal(&mut self, mut settings: ProcessSettings) {
        let previous = self.inner.settings().form_data.clone();
        let text = settings.form_data_text.take();
        if settings.form_data.is_none() {
            settings.form_data = previous;
        }
        self.inner.set_settings(settings);
        if let Some(text) = text {
            self.inner.settings_mut().set_form_data_text(text);
        }
    }

    fn execute_internal(&mut self) -> Result<ExecuteSummary, String> {
        if !self.inner.can_execute() {
            return Err("Session not ready for execution".to_string());
        }
        let artifact = self.inner.run().map_err(|e| e.to_string())?;
        let file_name = artifact.file_name.clone();
        let media_type = artifact.media_type;
        Ok(ExecuteSummary {
            file_name,
            media_type,
            metrics: self.inner.metrics().copied(),
        })
    }

    fn report_progress(&self, current: u32, total: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            let this = JsValue::null();
            let _ = callback.call3(
                &this,
                &JsValue::from(current),
                &JsValue::from(total),
                &JsValue::from_str(message),
            );
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
