use crate::core::constants::MAX_FRAME_STEP_MS;
use crate::core::{FrameClock, Lifecycle, Millis};
use crate::PageOrchestrator;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub orchestrator: Rc<RefCell<PageOrchestrator>>,
    /// Latest haunting time, shared with the message listener.
    pub now: Rc<Cell<Millis>>,
    pub clock: FrameClock,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(orchestrator: Rc<RefCell<PageOrchestrator>>, now: Rc<Cell<Millis>>) -> Self {
        Self {
            orchestrator,
            now,
            clock: FrameClock::new(MAX_FRAME_STEP_MS),
            last_instant: Instant::now(),
        }
    }

    /// One animation frame. Returns false once the page is torn down.
    pub fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        let t = self.clock.advance(dt.as_secs_f64() * 1000.0);
        self.now.set(t);

        let mut orch = self.orchestrator.borrow_mut();
        orch.advance(t);
        orch.renderer_mut()
            .animate(self.clock.now_ms(), self.clock.last_step_secs());
        !matches!(
            orch.lifecycle(),
            Lifecycle::Destroyed | Lifecycle::DisabledOnSite
        )
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !frame_ctx_tick.borrow_mut().frame() {
            log::debug!("[frame] loop stopped");
            return;
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let cb = tick.borrow().as_ref().map(|c| c.as_ref().clone());
    let (Some(w), Some(cb)) = (web::window(), cb) else {
        return;
    };
    _ = w.request_animation_frame(cb.unchecked_ref());
}
