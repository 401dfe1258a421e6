use crate::core::constants::TAG_PREFIX;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Viewport size in CSS pixels.
pub fn viewport() -> (f32, f32) {
    web::window()
        .map(|w| {
            let px = |v: Result<wasm_bindgen::JsValue, _>| {
                v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
            };
            (px(w.inner_width()), px(w.inner_height()))
        })
        .unwrap_or((0.0, 0.0))
}

/// Create an element carrying the haunted tag class plus any extra classes,
/// so a single selector finds everything we ever inserted.
pub fn create_tagged(
    document: &web::Document,
    tag: &str,
    kind: &str,
    extra: &[&str],
) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element(tag)
        .map_err(|e| anyhow::anyhow!("create <{}>: {:?}", tag, e))?;
    let list = el.class_list();
    _ = list.add_1(&format!("{}{}", TAG_PREFIX, kind));
    for class in extra {
        _ = list.add_1(class);
    }
    el.dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

/// Selector matching every element created by [`create_tagged`].
pub fn tagged_selector() -> String {
    format!("[class^='{0}'], [class*=' {0}']", TAG_PREFIX)
}

#[inline]
pub fn set_style(el: &web::HtmlElement, property: &str, value: &str) {
    _ = el.style().set_property(property, value);
}

#[inline]
pub fn set_px(el: &web::HtmlElement, property: &str, value: f32) {
    set_style(el, property, &format!("{:.1}px", value));
}

/// Every element matching `selector`, downcast to `HtmlElement`.
pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web::HtmlElement>().ok())
        .collect()
}

/// Attach a listener for the lifetime of the page.
pub fn add_listener<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(move |e: web::Event| {
        if let Ok(e) = e.dyn_into::<E>() {
            handler(e);
        }
    }) as Box<dyn FnMut(web::Event)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}
