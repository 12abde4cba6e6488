//! Browser bindings for UI event handlers.
//!
//! # Feature Flag
//!
//! Only available with the `wasm` feature enabled:
//!
//! ```toml
//! [dependencies]
//! tinticon = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { exportIco, fileName } from 'tinticon';
//!
//! await init();
//!
//! const svg = await (await fetch('https://cdn.simpleicons.org/github')).text();
//! const bytes = exportIco('github', svg, '#FF0000', new Uint32Array([16, 32, 48]));
//! const blob = new Blob([bytes], { type: 'image/x-icon' });
//! saveAs(blob, fileName('github', '#FF0000', 'ico'));
//! ```
//!
//! Colors that fail to parse fall back to black, matching the UI's
//! behavior for half-typed input.

use wasm_bindgen::prelude::*;

use crate::color::FillColor;
use crate::export;
use crate::icon::{self, OutputKind, VectorIcon};

fn to_js(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Returns the recolored markup as UTF-8 bytes.
#[wasm_bindgen(js_name = "exportSvg")]
pub fn export_svg(slug: &str, markup: &str, color: &str) -> Result<Vec<u8>, JsError> {
    let icon = VectorIcon::new(slug, markup);
    export::export_svg(&icon, &FillColor::parse_or_default(Some(color))).map_err(to_js)
}

/// Renders the recolored icon as a `size`×`size` PNG.
#[wasm_bindgen(js_name = "exportPng")]
pub fn export_png(slug: &str, markup: &str, color: &str, size: u32) -> Result<Vec<u8>, JsError> {
    let icon = VectorIcon::new(slug, markup);
    export::export_png(&icon, &FillColor::parse_or_default(Some(color)), size).map_err(to_js)
}

/// Packs one PNG frame per size into an ICO.
#[wasm_bindgen(js_name = "exportIco")]
pub fn export_ico(
    slug: &str,
    markup: &str,
    color: &str,
    sizes: &[u32],
) -> Result<Vec<u8>, JsError> {
    let icon = VectorIcon::new(slug, markup);
    export::export_ico(&icon, &FillColor::parse_or_default(Some(color)), sizes).map_err(to_js)
}

/// Builds the download name, e.g. `github-FF0000.ico`.
///
/// `kind` is one of `svg`, `png` or `ico`.
#[wasm_bindgen(js_name = "fileName")]
pub fn file_name(slug: &str, color: &str, kind: &str) -> Result<String, JsError> {
    let kind: OutputKind = kind.parse().map_err(|e: String| JsError::new(&e))?;
    Ok(icon::file_name(
        slug,
        &FillColor::parse_or_default(Some(color)),
        kind,
    ))
}
