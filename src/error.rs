//! Error type shared by the DOM seams and feature mounts.
//!
//! Nothing here is fatal: mounts surface a `WireError` to [`crate::App`],
//! which logs it and carries on with the remaining features.

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("browser window is unavailable")]
    MissingWindow,
    #[error("browser rejected call: {0}")]
    Js(String),
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(feature = "hydrate")]
impl From<wasm_bindgen::JsValue> for WireError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
