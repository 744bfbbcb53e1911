//! Error types for the kaleidoscope.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while setting up or drawing the kaleidoscope.
#[derive(Debug, Error)]
pub enum Error {
    /// No global `window` (not running in a browser page)
    #[error("no window")]
    NoWindow,

    /// The window has no document
    #[error("no document")]
    NoDocument,

    /// A required DOM element is missing
    #[error("element #{0} not found")]
    MissingElement(String),

    /// The canvas refused to hand out a 2D context
    #[error("2d canvas context unavailable")]
    NoContext,

    /// The document has no `<body>`
    #[error("document has no body")]
    NoBody,

    /// A canvas call threw
    #[error("canvas operation failed: {0}")]
    Canvas(String),

    /// Any other JS exception
    #[error("javascript error: {0}")]
    Js(String),

    /// The particle field needs at least one sprite
    #[error("no images to build the particle field from")]
    NoImages,
}

pub type Result<T> = std::result::Result<T, Error>;

fn js_text(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl Error {
    /// Wraps an exception thrown by a 2D context call.
    pub fn canvas(value: JsValue) -> Self {
        Error::Canvas(js_text(&value))
    }
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(js_text(&value))
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
