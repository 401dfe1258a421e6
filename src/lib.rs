//! Haunted Web: page haunting engine compiled to WASM for a browser extension.
//!
//! [`core`] holds all scheduling and safety logic and builds on any target.
//! The remaining modules are the browser glue and only exist on `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod background;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod messaging;
#[cfg(target_arch = "wasm32")]
mod page;
#[cfg(target_arch = "wasm32")]
mod render;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
pub use web_entry::*;

#[cfg(target_arch = "wasm32")]
pub(crate) type PageOrchestrator =
    core::Orchestrator<render::DomRenderer, audio::HorrorAudio, page::BrowserPage>;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::audio::HorrorAudio;
    use crate::core::{Lifecycle, Orchestrator};
    use crate::page::BrowserPage;
    use crate::render::DomRenderer;
    use crate::{dom, frame, messaging, storage};
    use glam::Vec2;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    pub use crate::background::start_background;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        // The service worker has no window; its shim calls `start_background`.
        if web_sys::window().is_none() {
            return Ok(());
        }
        log::info!("haunted-web starting");
        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    async fn init() -> anyhow::Result<()> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let seed = entropy_seed();
        let cursor = Rc::new(Cell::new(Vec2::ZERO));

        let orchestrator = Rc::new(RefCell::new(Orchestrator::new(
            DomRenderer::new(document.clone(), cursor.clone(), seed.rotate_left(21)),
            HorrorAudio::new(seed.rotate_left(42)),
            BrowserPage::new(),
            seed,
        )));

        let fetched = storage::load().await.map_err(anyhow::Error::from);
        orchestrator.borrow_mut().init(0, fetched);
        if orchestrator.borrow().lifecycle() == Lifecycle::DisabledOnSite {
            return Ok(());
        }

        let now = Rc::new(Cell::new(0));
        messaging::wire_page(&document, orchestrator.clone(), cursor);
        if let Err(e) = messaging::listen_runtime(orchestrator.clone(), now.clone()) {
            log::warn!("no extension messaging: {:#}", e);
        }
        frame::start_loop(Rc::new(RefCell::new(frame::FrameContext::new(
            orchestrator,
            now,
        ))));
        Ok(())
    }

    fn entropy_seed() -> u64 {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(_) => (js_sys::Math::random() * u64::MAX as f64) as u64,
        }
    }
}
