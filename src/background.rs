//! Background service worker: owns persisted settings and fans changes out to
//! every open tab.

use crate::core::{parse_message, Message, Response, Settings, UNKNOWN_MESSAGE};
use crate::messaging::reply;
use crate::storage::{self, call_async, global_path, to_js, StoreError};
use js_sys::{Array, Function, Object, Reflect, JSON};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

/// Register the worker's listeners. Called once by the worker's JS shim.
#[wasm_bindgen]
pub fn start_background() -> Result<(), JsValue> {
    add_listener(
        "chrome.runtime.onInstalled",
        Closure::wrap(Box::new(|details: JsValue| {
            let reason = Reflect::get(&details, &JsValue::from_str("reason"))
                .ok()
                .and_then(|r| r.as_string());
            if reason.as_deref() == Some("install") {
                spawn_local(async {
                    match storage::reset().await {
                        Ok(_) => log::info!("[background] installed, defaults stored"),
                        Err(e) => log::error!("[background] storing defaults: {}", e),
                    }
                });
            }
        }) as Box<dyn FnMut(JsValue)>)
        .into_js_value(),
    )?;

    add_listener(
        "chrome.runtime.onMessage",
        Closure::wrap(Box::new(
            |request: JsValue, _sender: JsValue, respond: JsValue| -> JsValue {
                spawn_local(async move {
                    let text: String = JSON::stringify(&request)
                        .map(String::from)
                        .unwrap_or_default();
                    let response = handle(&text).await;
                    reply(&respond, &response);
                });
                // Keep the channel open for the async response
                JsValue::TRUE
            },
        ) as Box<dyn FnMut(JsValue, JsValue, JsValue) -> JsValue>)
        .into_js_value(),
    )?;
    log::info!("[background] listening");
    Ok(())
}

fn add_listener(event_path: &str, callback: JsValue) -> Result<(), JsValue> {
    let event = global_path(event_path)
        .ok_or_else(|| JsValue::from_str(&format!("{} unavailable", event_path)))?;
    let add = Reflect::get(&event, &JsValue::from_str("addListener"))?.dyn_into::<Function>()?;
    add.call1(&event, &callback)?;
    Ok(())
}

async fn handle(text: &str) -> Response {
    let Ok(message) = parse_message(text) else {
        return Response::failure(UNKNOWN_MESSAGE);
    };
    match apply(&message).await {
        Ok(Some(settings)) => Response::with_settings(settings),
        Ok(None) => Response::ok(),
        Err(e) => {
            log::error!("[background] {:?}: {}", message, e);
            Response::failure(e.to_string())
        }
    }
}

/// Persist what the message changes, then forward settings changes and
/// panics to every tab.
async fn apply(message: &Message) -> Result<Option<Settings>, StoreError> {
    let Some(patch) = message.persisted_patch() else {
        return storage::load().await.map(Some);
    };
    storage::update(&patch).await?;
    if matches!(message, Message::UpdateSettings { .. } | Message::Panic) {
        broadcast(message).await;
    }
    Ok(None)
}

async fn broadcast(message: &Message) {
    let Some(tabs_api) = global_path("chrome.tabs") else {
        return;
    };
    let payload = match to_js(message) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("[background] encode broadcast: {}", e);
            return;
        }
    };
    let tabs = match call_async(&tabs_api, "query", &[Object::new().into()]).await {
        Ok(t) => Array::from(&t),
        Err(e) => {
            log::warn!("[background] tabs.query: {:?}", e);
            return;
        }
    };
    for tab in tabs.iter() {
        let Ok(id) = Reflect::get(&tab, &JsValue::from_str("id")) else {
            continue;
        };
        if id.is_undefined() {
            continue;
        }
        let (api, payload) = (tabs_api.clone(), payload.clone());
        spawn_local(async move {
            // Tabs without a content script reject; nothing to do for them.
            _ = call_async(&api, "sendMessage", &[id, payload]).await;
        });
    }
}
