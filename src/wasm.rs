//! WASM bindings for browser-based page encoding and decoding.
//!
//! This module exposes the HTML codec to JavaScript via wasm-bindgen.
//! Documents cross the boundary as the same JSON the storage layer keeps.

use wasm_bindgen::prelude::*;

use crate::Editor;
use crate::export::{HtmlConfig, HtmlVariant};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Render stored sections as HTML.
///
/// Takes the sections JSON and returns the preview page when `preview` is
/// set, the standalone page otherwise.
#[wasm_bindgen(js_name = encodeHtml)]
pub fn encode_html(sections_json: &str, preview: bool) -> Result<String, JsValue> {
    let mut editor = Editor::new();
    editor.load_json(sections_json).map_err(js_error)?;

    let variant = if preview {
        HtmlVariant::Preview
    } else {
        HtmlVariant::Standalone
    };
    Ok(editor.export_html(&HtmlConfig::default().with_variant(variant)))
}

/// Recover sections from an exported page.
///
/// Returns the sections JSON; markup without recognised sections yields `[]`.
#[wasm_bindgen(js_name = decodeHtml)]
pub fn decode_html(html: &str) -> Result<String, JsValue> {
    let mut editor = Editor::new();
    editor.import_html(html);
    editor.to_json().map_err(js_error)
}

/// Whether an uploaded page carries editable markup.
#[wasm_bindgen(js_name = isEditableHtml)]
pub fn is_editable_html(html: &str) -> bool {
    crate::import::is_editable_html(html)
}

/// Hosting-safe filename for a page name.
#[wasm_bindgen(js_name = publishFilename)]
pub fn publish_filename(name: &str) -> String {
    crate::publish::publish_filename(name)
}
