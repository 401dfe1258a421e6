//! Settings persistence on `chrome.storage.sync`.

use crate::core::{Settings, SettingsPatch};
use js_sys::{Function, Promise, Reflect, JSON};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("chrome.storage.sync is unavailable")]
    Unavailable,
    #[error("storage call failed: {0}")]
    Js(String),
    #[error("settings encoding: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<JsValue> for StoreError {
    fn from(e: JsValue) -> Self {
        StoreError::Js(format!("{:?}", e))
    }
}

/// Walk a dotted path from the global object, e.g. `chrome.storage.sync`.
pub(crate) fn global_path(path: &str) -> Option<JsValue> {
    let mut cur: JsValue = js_sys::global().into();
    for key in path.split('.') {
        cur = Reflect::get(&cur, &JsValue::from_str(key)).ok()?;
        if cur.is_undefined() || cur.is_null() {
            return None;
        }
    }
    Some(cur)
}

/// Call `target[method](args...)` and await the promise it returns.
pub(crate) async fn call_async(
    target: &JsValue,
    method: &str,
    args: &[JsValue],
) -> Result<JsValue, JsValue> {
    let f = Reflect::get(target, &JsValue::from_str(method))?.dyn_into::<Function>()?;
    let argv: js_sys::Array = args.iter().collect();
    let ret = f.apply(target, &argv)?;
    match ret.dyn_into::<Promise>() {
        Ok(p) => JsFuture::from(p).await,
        Err(v) => Ok(v),
    }
}

pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, StoreError> {
    let text = serde_json::to_string(value)?;
    Ok(JSON::parse(&text)?)
}

pub(crate) fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> Result<T, StoreError> {
    let text: String = JSON::stringify(value)?.into();
    Ok(serde_json::from_str(&text)?)
}

fn area() -> Result<JsValue, StoreError> {
    global_path("chrome.storage.sync").ok_or(StoreError::Unavailable)
}

/// Stored settings with defaults filled in for missing keys.
pub async fn load() -> Result<Settings, StoreError> {
    let raw = call_async(&area()?, "get", &[JsValue::NULL]).await?;
    let settings: Settings = from_js(&raw)?;
    Ok(settings.clamped())
}

pub async fn save(settings: &Settings) -> Result<(), StoreError> {
    call_async(&area()?, "set", &[to_js(settings)?]).await?;
    Ok(())
}

/// Read, merge, write. Returns what was written.
pub async fn update(patch: &SettingsPatch) -> Result<Settings, StoreError> {
    let next = load().await?.merged(patch);
    save(&next).await?;
    Ok(next)
}

pub async fn reset() -> Result<Settings, StoreError> {
    let defaults = Settings::default();
    save(&defaults).await?;
    Ok(defaults)
}
