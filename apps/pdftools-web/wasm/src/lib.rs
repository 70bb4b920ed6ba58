//! WASM bindings for the PDF tools
//!
//! All tool state lives in `PdfToolsSession`; the page handles DOM events,
//! reads files and triggers the download.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PdfToolsSession, listFeatures } from './pkg/pdftools_wasm.js';
//!
//! await init();
//!
//! const session = new PdfToolsSession();
//! const profile = session.selectFeature("split");
//! session.addFile(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! session.setSettings({ splitMethod: "range", pageRange: "1-3, 5" });
//! const { fileName } = session.execute();
//! downloadBlob(session.artifactBytes(), fileName);
//! ```

pub mod session;

use wasm_bindgen::prelude::*;

pub use session::PdfToolsSession;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// The tool catalog as an array of `{id, title, description}`
#[wasm_bindgen(js_name = listFeatures)]
pub fn list_features() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&pdftools_core::FEATURES)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Accepted extensions, upload prompt and settings schema for a tool id
#[wasm_bindgen(js_name = getUploadProfile)]
pub fn get_upload_profile(id: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&pdftools_core::profile(id))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Get page count from PDF bytes
#[wasm_bindgen(js_name = getPageCount)]
pub fn get_page_count(bytes: &[u8]) -> Result<u32, JsValue> {
    pdftools_core::get_page_count(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}
