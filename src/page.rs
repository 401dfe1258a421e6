use crate::core::PageProbe;
use crate::dom;
use wasm_bindgen::JsCast;
use web_sys as web;

const CALL_SELECTOR: &str = "video[autoplay]";
const LOGIN_SELECTOR: &str =
    "input[type=\"password\"], form[action*=\"login\" i], form[action*=\"signin\" i]";

/// Live view of the current document for the safety checks.
#[derive(Clone, Default)]
pub struct BrowserPage;

impl BrowserPage {
    pub fn new() -> Self {
        Self
    }

    fn matches(&self, selector: &str) -> bool {
        dom::window_document()
            .and_then(|d| d.query_selector(selector).ok().flatten())
            .is_some()
    }
}

impl PageProbe for BrowserPage {
    fn is_fullscreen_or_call(&self) -> bool {
        let fullscreen = dom::window_document()
            .and_then(|d| d.fullscreen_element())
            .is_some();
        fullscreen || self.matches(CALL_SELECTOR)
    }

    fn has_focused_input(&self) -> bool {
        let Some(active) = dom::window_document().and_then(|d| d.active_element()) else {
            return false;
        };
        let tag = active.tag_name();
        tag.eq_ignore_ascii_case("input")
            || tag.eq_ignore_ascii_case("textarea")
            || active
                .dyn_ref::<web::HtmlElement>()
                .map_or(false, |el| el.is_content_editable())
    }

    fn looks_like_login(&self) -> bool {
        self.matches(LOGIN_SELECTOR)
    }

    fn prefers_reduced_motion(&self) -> bool {
        web::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .map_or(false, |mq| mq.matches())
    }

    fn hostname(&self) -> String {
        web::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default()
    }

    fn local_hour(&self) -> u32 {
        js_sys::Date::new_0().get_hours()
    }
}
