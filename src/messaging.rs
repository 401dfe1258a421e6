//! Content-script wiring: extension messages in, page events in.

use crate::core::{Millis, Response};
use crate::dom;
use crate::storage::{global_path, to_js};
use crate::PageOrchestrator;
use glam::Vec2;
use js_sys::{Function, Reflect, JSON};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Route `chrome.runtime.onMessage` into the orchestrator and answer through
/// `sendResponse` synchronously.
pub fn listen_runtime(
    orchestrator: Rc<RefCell<PageOrchestrator>>,
    now: Rc<Cell<Millis>>,
) -> anyhow::Result<()> {
    let on_message = global_path("chrome.runtime.onMessage")
        .ok_or_else(|| anyhow::anyhow!("chrome.runtime.onMessage unavailable"))?;
    let add = Reflect::get(&on_message, &JsValue::from_str("addListener"))
        .and_then(|f| f.dyn_into::<Function>())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let closure = Closure::wrap(Box::new(
        move |request: JsValue, _sender: JsValue, respond: JsValue| -> JsValue {
            let text: String = JSON::stringify(&request)
                .map(String::from)
                .unwrap_or_default();
            let response = orchestrator.borrow_mut().handle_json(now.get(), &text);
            reply(&respond, &response);
            JsValue::FALSE
        },
    ) as Box<dyn FnMut(JsValue, JsValue, JsValue) -> JsValue>);
    add.call1(&on_message, closure.as_ref())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    closure.forget();
    Ok(())
}

pub(crate) fn reply(respond: &JsValue, response: &Response) {
    let Some(f) = respond.dyn_ref::<Function>() else {
        return;
    };
    match to_js(response) {
        Ok(v) => {
            _ = f.call1(&JsValue::NULL, &v);
        }
        Err(e) => log::warn!("[messaging] response encode: {}", e),
    }
}

/// Page-level listeners: first gesture unlocks audio, the pointer feeds
/// cursor-chasing sprites, and `pagehide` tears everything down.
pub fn wire_page(
    document: &web::Document,
    orchestrator: Rc<RefCell<PageOrchestrator>>,
    cursor: Rc<Cell<Vec2>>,
) {
    let target: &web::EventTarget = document.as_ref();
    unlock_audio_on_gesture(target, orchestrator.clone());

    dom::add_listener::<web::MouseEvent>(target, "mousemove", move |e| {
        cursor.set(Vec2::new(e.client_x() as f32, e.client_y() as f32));
    });

    if let Some(window) = web::window() {
        let orch = orchestrator;
        dom::add_listener::<web::Event>(window.as_ref(), "pagehide", move |_| {
            log::debug!("[messaging] pagehide, tearing down");
            orch.borrow_mut().destroy();
        });
    }
}

const GESTURES: [&str; 2] = ["click", "keydown"];

/// One shared click/keydown listener that detaches itself once audio is
/// unlocked. A failed unlock leaves it in place for the next gesture.
fn unlock_audio_on_gesture(
    target: &web::EventTarget,
    orchestrator: Rc<RefCell<PageOrchestrator>>,
) {
    let handler: Rc<RefCell<Option<Closure<dyn FnMut(web::Event)>>>> =
        Rc::new(RefCell::new(None));
    let handler_self = handler.clone();
    let owner = target.clone();
    *handler.borrow_mut() = Some(Closure::wrap(Box::new(move |_: web::Event| {
        let done = {
            let mut orch = orchestrator.borrow_mut();
            orch.on_user_interaction();
            !orch.wants_gesture()
        };
        if !done {
            return;
        }
        if let Some(cb) = handler_self.borrow().as_ref() {
            for event in GESTURES {
                _ = owner
                    .remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
            }
        }
        log::debug!("[messaging] gesture listeners detached");
    }) as Box<dyn FnMut(web::Event)>));

    if let Some(cb) = handler.borrow().as_ref() {
        for event in GESTURES {
            _ = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
        }
    }
}
