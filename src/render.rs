//! DOM renderer: every visual the core asks for becomes a tagged element
//! animated from the frame loop. Nothing here owns a timer; lifetimes are
//! deadlines checked in [`DomRenderer::animate`].

use crate::core::{
    AmbientEffect, CorruptionKind, EffectId, Edge, GhostBehavior, Renderer, SpiderBehavior,
};
use crate::dom;
use fnv::FnvHashMap;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub static HAUNTED_CSS: &str = include_str!("../assets/haunted.css");

const GHOST_W: u32 = 150;
const GHOST_H: u32 = 200;
const FADE_MS: f64 = 500.0;
const FOG_PARTICLES: usize = 50;
const TRAIL_LEN: usize = 10;
const FLICKER_STEPS: [f64; 5] = [100.0, 300.0, 100.0, 400.0, 100.0];
const TEXT_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, span, a, li";

enum Motion {
    /// Ease toward a point; `rate` is the fraction covered per 60 Hz frame.
    Seek { target: Vec2, rate: f32 },
    /// Chase the cursor, stopping `stop` px short.
    Chase { speed: f32, stop: f32 },
    /// Straight line at constant speed; the sprite expires on arrival.
    Walk { target: Vec2, speed: f32 },
    Hold,
}

struct Sprite {
    el: web::HtmlElement,
    pos: Vec2,
    motion: Motion,
    expires_at: f64,
    thread: Option<web::HtmlElement>,
    fading: bool,
}

/// An inline style we overrode, with the value to put back.
struct Residue {
    el: web::HtmlElement,
    property: &'static str,
    original: String,
    restore_at: f64,
}

enum TransientKind {
    Static,
    CursorTrail(Vec<Vec2>),
    Blink,
}

struct Transient {
    el: web::HtmlElement,
    born: f64,
    remove_at: f64,
    kind: TransientKind,
}

struct Particle {
    pos: Vec2,
    vel: Vec2,
    size: f32,
    opacity: f32,
}

struct Fog {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    particles: Vec<Particle>,
}

pub struct DomRenderer {
    document: web::Document,
    cursor: Rc<Cell<Vec2>>,
    rng: StdRng,
    now: f64,
    sprites: FnvHashMap<EffectId, Sprite>,
    residue: Vec<Residue>,
    transients: Vec<Transient>,
    fog: Option<Fog>,
    style_injected: bool,
}

impl DomRenderer {
    pub fn new(document: web::Document, cursor: Rc<Cell<Vec2>>, seed: u64) -> Self {
        Self {
            document,
            cursor,
            rng: StdRng::seed_from_u64(seed),
            now: 0.0,
            sprites: FnvHashMap::default(),
            residue: Vec::new(),
            transients: Vec::new(),
            fog: None,
            style_injected: false,
        }
    }

    /// Per-frame step: move sprites, retire anything past its deadline and
    /// redraw the fog.
    pub fn animate(&mut self, now: f64, dt: f32) {
        self.now = now;
        let cursor = self.cursor.get();

        let mut expired = Vec::new();
        for (id, s) in self.sprites.iter_mut() {
            match s.motion {
                Motion::Seek { target, rate } => {
                    let k = 1.0 - (1.0 - rate).powf(dt * 60.0);
                    s.pos += (target - s.pos) * k;
                }
                Motion::Chase { speed, stop } => {
                    let d = cursor - s.pos;
                    if d.length() > stop {
                        s.pos += d.normalize_or_zero() * speed * dt;
                    }
                }
                Motion::Walk { target, speed } => {
                    let d = target - s.pos;
                    let step = speed * dt;
                    if d.length() <= step {
                        s.pos = target;
                        s.expires_at = s.expires_at.min(now);
                    } else {
                        s.pos += d.normalize_or_zero() * step;
                    }
                }
                Motion::Hold => {}
            }
            dom::set_px(&s.el, "left", s.pos.x);
            dom::set_px(&s.el, "top", s.pos.y);
            if let Some(thread) = &s.thread {
                dom::set_px(thread, "height", s.pos.y.max(0.0) + 50.0);
            }
            if now >= s.expires_at {
                expired.push(*id);
            } else if !s.fading && now >= s.expires_at - FADE_MS {
                dom::set_style(&s.el, "opacity", "0");
                s.fading = true;
            }
        }
        for id in expired {
            self.destroy(id);
        }

        let (due, keep): (Vec<_>, Vec<_>) =
            self.residue.drain(..).partition(|r| now >= r.restore_at);
        self.residue = keep;
        for r in due {
            restore(&r);
        }

        self.transients.retain_mut(|t| {
            if now >= t.remove_at {
                t.el.remove();
                return false;
            }
            match &mut t.kind {
                TransientKind::Static => {}
                TransientKind::CursorTrail(points) => {
                    points.push(cursor);
                    if points.len() > TRAIL_LEN {
                        points.remove(0);
                    }
                    draw_trail(&t.el, points);
                }
                TransientKind::Blink => {
                    let mut elapsed = now - t.born;
                    let mut step = FLICKER_STEPS.len() - 1;
                    for (i, d) in FLICKER_STEPS.iter().enumerate() {
                        if elapsed < *d {
                            step = i;
                            break;
                        }
                        elapsed -= d;
                    }
                    dom::set_style(&t.el, "opacity", if step % 2 == 0 { "1" } else { "0" });
                }
            }
            true
        });

        if let Some(fog) = &mut self.fog {
            fog.step(dt);
        }
    }

    fn body(&self) -> Option<web::HtmlElement> {
        self.document.body()
    }

    fn ensure_style(&mut self) {
        if self.style_injected {
            return;
        }
        let Ok(style) = dom::create_tagged(&self.document, "style", "style", &[]) else {
            return;
        };
        style.set_text_content(Some(HAUNTED_CSS));
        if let Some(head) = self.document.head() {
            _ = head.append_child(&style);
            self.style_injected = true;
        }
    }

    fn attach(&mut self, el: &web::HtmlElement) {
        self.ensure_style();
        if let Some(body) = self.body() {
            _ = body.append_child(el);
        }
    }

    fn edge_point(&mut self, edge: Edge, margin: f32) -> Vec2 {
        let (w, h) = dom::viewport();
        match edge {
            Edge::Top => Vec2::new(self.rng.gen_range(0.0..=w), -margin),
            Edge::Bottom => Vec2::new(self.rng.gen_range(0.0..=w), h + margin),
            Edge::Left => Vec2::new(-margin, self.rng.gen_range(0.0..=h)),
            Edge::Right => Vec2::new(w + margin, self.rng.gen_range(0.0..=h)),
        }
    }

    fn random_edge(&mut self) -> Edge {
        *Edge::ALL.choose(&mut self.rng).unwrap_or(&Edge::Left)
    }

    fn insert_sprite(
        &mut self,
        id: EffectId,
        el: web::HtmlElement,
        pos: Vec2,
        motion: Motion,
        life_ms: f64,
    ) -> &mut Sprite {
        self.attach(&el);
        dom::set_px(&el, "left", pos.x);
        dom::set_px(&el, "top", pos.y);
        let sprite = Sprite {
            el,
            pos,
            motion,
            expires_at: self.now + life_ms,
            thread: None,
            fading: false,
        };
        self.sprites.entry(id).or_insert(sprite)
    }

    /// Override one inline style until `hold_ms` from now. An element already
    /// overridden keeps its first saved value.
    fn override_style(
        &mut self,
        el: &web::HtmlElement,
        property: &'static str,
        value: &str,
        hold_ms: f64,
    ) {
        let restore_at = self.now + hold_ms;
        if let Some(r) = self
            .residue
            .iter_mut()
            .find(|r| r.property == property && &r.el == el)
        {
            r.restore_at = r.restore_at.max(restore_at);
        } else {
            let original = el.style().get_property_value(property).unwrap_or_default();
            self.residue.push(Residue {
                el: el.clone(),
                property,
                original,
                restore_at,
            });
        }
        dom::set_style(el, property, value);
    }

    fn add_transient(&mut self, el: web::HtmlElement, life_ms: f64, kind: TransientKind) {
        self.attach(&el);
        self.transients.push(Transient {
            el,
            born: self.now,
            remove_at: self.now + life_ms,
            kind,
        });
    }

    fn ghost_element(&mut self, behavior: GhostBehavior) -> anyhow::Result<web::HtmlElement> {
        let el = dom::create_tagged(&self.document, "div", "ghost", &[])?;
        _ = el.set_attribute("data-behavior", behavior.name());
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        canvas.set_width(GHOST_W);
        canvas.set_height(GHOST_H);
        let ctx = context_2d(&canvas)?;
        draw_ghost(&ctx, GHOST_W as f64, GHOST_H as f64, self.rng.gen_range(0.0..PI));
        _ = el.append_child(&canvas);
        Ok(el)
    }

    fn spider_element(&self) -> anyhow::Result<web::HtmlElement> {
        let el = dom::create_tagged(&self.document, "div", "spider", &[])?;
        let body = dom::create_tagged(&self.document, "div", "spider-part", &["spider-body"])?;
        for i in 1..=8 {
            let nth = format!("spider-leg-{}", i);
            let leg = dom::create_tagged(
                &self.document,
                "div",
                "spider-part",
                &["spider-leg", nth.as_str()],
            )?;
            _ = body.append_child(&leg);
        }
        for eye in ["spider-eye-1", "spider-eye-2"] {
            let e = dom::create_tagged(&self.document, "div", "spider-part", &["spider-eye", eye])?;
            _ = body.append_child(&e);
        }
        _ = el.append_child(&body);
        Ok(el)
    }

    fn text_targets(&self) -> Vec<web::HtmlElement> {
        dom::query_all(&self.document, TEXT_SELECTOR)
            .into_iter()
            .filter(|el| {
                el.text_content()
                    .map_or(false, |t| !t.trim().is_empty())
            })
            .collect()
    }
}

impl Renderer for DomRenderer {
    fn spawn_ghost(&mut self, id: EffectId, behavior: GhostBehavior, intensity: f32) {
        let el = match self.ghost_element(behavior) {
            Ok(el) => el,
            Err(e) => {
                log::warn!("[render] ghost: {:#}", e);
                return;
            }
        };
        dom::set_style(&el, "opacity", &format!("{:.2}", (0.5 + intensity * 0.4).min(0.95)));
        let (w, h) = dom::viewport();
        let edge = self.random_edge();
        let (pos, motion, life) = match behavior {
            GhostBehavior::Slide => {
                let from = self.edge_point(edge, 100.0);
                let to = self.edge_point(edge.opposite(), 100.0);
                (from, Motion::Seek { target: to, rate: 0.02 }, 5000.0)
            }
            GhostBehavior::Teleport => {
                let at = Vec2::new(self.rng.gen_range(0.0..=w), self.rng.gen_range(0.0..=h));
                (at, Motion::Hold, self.rng.gen_range(2000.0..5000.0))
            }
            GhostBehavior::Follow => {
                let from = self.edge_point(edge, 0.0);
                let motion = Motion::Chase { speed: 180.0, stop: 50.0 };
                (from, motion, self.rng.gen_range(3000.0..7000.0))
            }
            GhostBehavior::Peek => {
                // Half hidden behind the chosen edge
                let at = self.edge_point(edge, -40.0);
                (at, Motion::Hold, 3000.0)
            }
            GhostBehavior::Stare => {
                let at = Vec2::new(
                    w / 2.0 + self.rng.gen_range(-200.0..200.0),
                    h / 2.0 + self.rng.gen_range(-150.0..150.0),
                );
                self.distort_near(at, intensity);
                (at, Motion::Hold, 5000.0)
            }
            GhostBehavior::Crawl => {
                let x = self.rng.gen_range(100.0..(w - 100.0).max(101.0));
                let target = Vec2::new(x, h - 250.0);
                (Vec2::new(x, h + 200.0), Motion::Seek { target, rate: 0.01 }, 10_000.0 + FADE_MS)
            }
        };
        if behavior == GhostBehavior::Teleport {
            self.distort_near(pos, intensity);
        }
        self.insert_sprite(id, el, pos, motion, life);
    }

    fn spawn_spider(&mut self, id: EffectId, behavior: SpiderBehavior, intensity: f32) {
        let el = match self.spider_element() {
            Ok(el) => el,
            Err(e) => {
                log::warn!("[render] spider: {:#}", e);
                return;
            }
        };
        let scale = 0.8 + intensity.clamp(0.0, 2.0) * 0.4;
        dom::set_style(&el, "transform", &format!("scale({:.2})", scale));
        let speed = self.rng.gen_range(60.0..180.0);
        let (w, _) = dom::viewport();
        match behavior {
            SpiderBehavior::Walk => {
                let edge = self.random_edge();
                let from = self.edge_point(edge, 50.0);
                let target = self.edge_point(edge.opposite(), 50.0);
                self.insert_sprite(id, el, from, Motion::Walk { target, speed }, 20_000.0);
            }
            SpiderBehavior::Drop => {
                let x = self.rng.gen_range(100.0..(w - 100.0).max(101.0));
                let target = Vec2::new(x, self.rng.gen_range(200.0..400.0));
                let thread = dom::create_tagged(&self.document, "div", "spider-part", &["spider-thread"]);
                let sprite = self.insert_sprite(
                    id,
                    el,
                    Vec2::new(x, -50.0),
                    Motion::Seek { target, rate: 0.03 },
                    8000.0,
                );
                if let Ok(thread) = thread {
                    _ = sprite.el.append_child(&thread);
                    sprite.thread = Some(thread);
                }
            }
            SpiderBehavior::Inspect => {
                let edge = self.random_edge();
                let from = self.edge_point(edge, 0.0);
                let life = self.rng.gen_range(5000.0..10_000.0);
                self.insert_sprite(id, el, from, Motion::Chase { speed, stop: 40.0 }, life);
            }
        }
    }

    fn destroy(&mut self, id: EffectId) {
        if let Some(s) = self.sprites.remove(&id) {
            s.el.remove();
        }
    }

    fn apply_corruption(&mut self, kind: CorruptionKind, intensity: f32) -> bool {
        let k = intensity.clamp(0.25, 2.0) as f64;
        let Some(body) = self.body() else {
            return false;
        };
        match kind {
            CorruptionKind::TextMutation => {
                let targets = self.text_targets();
                if targets.is_empty() {
                    return false;
                }
                for _ in 0..self.rng.gen_range(1..=5) {
                    let Some(el) = targets.choose(&mut self.rng).cloned() else {
                        break;
                    };
                    let (transform, filter) = match self.rng.gen_range(0..4) {
                        0 => ("scaleX(-1)".to_string(), "none"),
                        1 => ("scaleY(1.5) scaleX(0.8)".to_string(), "none"),
                        2 => (format!("skewX({:.1}deg)", self.rng.gen_range(-20.0..20.0) * k), "none"),
                        _ => (format!("translateY({:.1}px)", self.rng.gen_range(5.0..15.0) * k), "blur(2px)"),
                    };
                    let hold = self.rng.gen_range(1000.0..3000.0);
                    self.override_style(&el, "transform", &transform, hold);
                    self.override_style(&el, "filter", filter, hold);
                }
            }
            CorruptionKind::LayoutTilt => {
                let angle = self.rng.gen_range(-2.0..2.0) * k;
                let hold = self.rng.gen_range(2000.0..4000.0);
                self.override_style(&body, "transform", &format!("rotate({:.2}deg)", angle), hold);
            }
            CorruptionKind::CursorCorruption => {
                let Ok(el) = dom::create_tagged(&self.document, "div", "cursor-trail", &[]) else {
                    return false;
                };
                let life = self.rng.gen_range(3000.0..6000.0);
                self.add_transient(el, life, TransientKind::CursorTrail(Vec::new()));
            }
            CorruptionKind::ColorShift => {
                let hold = self.rng.gen_range(1000.0..3000.0);
                self.override_style(
                    &body,
                    "filter",
                    "hue-rotate(180deg) saturate(0.5) brightness(0.8)",
                    hold,
                );
            }
            CorruptionKind::LinkSabotage => {
                let links = dom::query_all(&self.document, "a");
                if links.is_empty() {
                    return false;
                }
                let count = self.rng.gen_range(3..=10).min(links.len());
                let hold = self.rng.gen_range(5000.0..10_000.0);
                let chosen: Vec<web::HtmlElement> =
                    links.choose_multiple(&mut self.rng, count).cloned().collect();
                for el in &chosen {
                    let dx = self.rng.gen_range(-10.0..10.0) * k;
                    let dy = self.rng.gen_range(-10.0..10.0) * k;
                    let shift = format!("translate({:.1}px, {:.1}px)", dx, dy);
                    self.override_style(el, "transform", &shift, hold);
                }
            }
        }
        true
    }

    fn start_fog(&mut self) {
        if self.fog.is_some() {
            return;
        }
        match Fog::new(&self.document, &mut self.rng) {
            Ok(fog) => {
                self.attach(&fog.canvas);
                self.fog = Some(fog);
            }
            Err(e) => log::warn!("[render] fog: {:#}", e),
        }
    }

    fn stop_fog(&mut self) {
        if let Some(fog) = self.fog.take() {
            fog.canvas.remove();
        }
    }

    fn ambient(&mut self, effect: AmbientEffect) {
        let made = match effect {
            AmbientEffect::Shadow { edge } => {
                let class = format!("shadow-{}", edge.name());
                dom::create_tagged(&self.document, "div", "shadow", &[class.as_str()])
                    .map(|el| (el, 5000.0, TransientKind::Static))
            }
            AmbientEffect::Glitch { glitch } => {
                let class = format!("glitch-{}", glitch.name());
                let life = self.rng.gen_range(100.0..400.0);
                dom::create_tagged(&self.document, "div", "glitch", &[class.as_str()])
                    .map(|el| (el, life, TransientKind::Static))
            }
            AmbientEffect::BloodDrip { x_frac } => {
                let run = self.rng.gen_range(2.0..4.0);
                dom::create_tagged(&self.document, "div", "blood-drip", &[]).map(|el| {
                    let (w, _) = dom::viewport();
                    dom::set_px(&el, "left", x_frac * w);
                    dom::set_style(&el, "animation-duration", &format!("{:.1}s", run));
                    (el, 5000.0, TransientKind::Static)
                })
            }
            AmbientEffect::Flicker { silhouettes } => self.flicker_overlay(silhouettes),
        };
        match made {
            Ok((el, life, kind)) => self.add_transient(el, life, kind),
            Err(e) => log::warn!("[render] ambient {:?}: {:#}", effect, e),
        }
    }

    fn cleanup(&mut self) {
        for (_, s) in self.sprites.drain() {
            s.el.remove();
        }
        for r in self.residue.drain(..) {
            restore(&r);
        }
        for t in self.transients.drain(..) {
            t.el.remove();
        }
        self.stop_fog();
        for el in dom::query_all(&self.document, &dom::tagged_selector()) {
            el.remove();
        }
        self.style_injected = false;
        if let Some(body) = self.body() {
            _ = body.style().remove_property("transform");
            _ = body.style().remove_property("filter");
        }
    }
}

impl DomRenderer {
    fn flicker_overlay(
        &mut self,
        silhouettes: u32,
    ) -> anyhow::Result<(web::HtmlElement, f64, TransientKind)> {
        let overlay = dom::create_tagged(&self.document, "div", "flicker-overlay", &[])?;
        for _ in 0..silhouettes {
            let s = dom::create_tagged(&self.document, "div", "silhouette", &[])?;
            dom::set_style(&s, "left", &format!("{:.0}%", self.rng.gen_range(10.0..80.0)));
            dom::set_style(&s, "top", &format!("{:.0}%", self.rng.gen_range(20.0..60.0)));
            dom::set_px(&s, "width", self.rng.gen_range(100.0..200.0));
            dom::set_px(&s, "height", self.rng.gen_range(150.0..300.0));
            _ = overlay.append_child(&s);
        }
        Ok((overlay, FLICKER_STEPS.iter().sum(), TransientKind::Blink))
    }

    /// Skew text near a point for a second, the way a passing ghost would.
    fn distort_near(&mut self, at: Vec2, intensity: f32) {
        let k = intensity.clamp(0.25, 2.0);
        for el in dom::query_all(&self.document, TEXT_SELECTOR) {
            let r = el.get_bounding_client_rect();
            let centre = Vec2::new(
                (r.left() + r.width() / 2.0) as f32,
                (r.top() + r.height() / 2.0) as f32,
            );
            if centre.distance(at) >= 300.0 {
                continue;
            }
            let skew = self.rng.gen_range(-5.0..5.0) * k;
            let sy = self.rng.gen_range(0.95..1.05);
            let value = format!("skewX({:.1}deg) scaleY({:.3})", skew, sy);
            self.override_style(&el, "transform", &value, 1000.0);
        }
    }
}

impl Fog {
    fn new(document: &web::Document, rng: &mut StdRng) -> anyhow::Result<Self> {
        let canvas = dom::create_tagged(document, "canvas", "fog", &[])?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let (w, h) = dom::viewport();
        canvas.set_width(w.max(1.0) as u32);
        canvas.set_height(h.max(1.0) as u32);
        let ctx = context_2d(&canvas)?;
        let particles = (0..FOG_PARTICLES)
            .map(|_| Particle {
                pos: Vec2::new(rng.gen_range(0.0..=w), rng.gen_range(0.0..=h)),
                vel: Vec2::new(rng.gen_range(-30.0..30.0), rng.gen_range(-18.0..18.0)),
                size: rng.gen_range(100.0..300.0),
                opacity: rng.gen_range(0.05..0.15),
            })
            .collect();
        Ok(Self {
            canvas,
            ctx,
            particles,
        })
    }

    #[allow(deprecated)]
    fn step(&mut self, dt: f32) {
        let (w, h) = dom::viewport();
        if self.canvas.width() != w as u32 || self.canvas.height() != h as u32 {
            self.canvas.set_width(w.max(1.0) as u32);
            self.canvas.set_height(h.max(1.0) as u32);
        }
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            // Wrap once fully off screen
            if p.pos.x < -p.size {
                p.pos.x = w + p.size;
            } else if p.pos.x > w + p.size {
                p.pos.x = -p.size;
            }
            if p.pos.y < -p.size {
                p.pos.y = h + p.size;
            } else if p.pos.y > h + p.size {
                p.pos.y = -p.size;
            }
            let (x, y, r) = (p.pos.x as f64, p.pos.y as f64, p.size as f64);
            let Ok(g) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) else {
                continue;
            };
            _ = g.add_color_stop(0.0, &format!("rgba(200, 200, 220, {:.3})", p.opacity));
            _ = g.add_color_stop(1.0, "rgba(200, 200, 220, 0)");
            self.ctx.set_fill_style(&JsValue::from(g));
            self.ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
        }
    }
}

fn restore(r: &Residue) {
    if r.original.is_empty() {
        _ = r.el.style().remove_property(r.property);
    } else {
        dom::set_style(&r.el, r.property, &r.original);
    }
}

fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

fn draw_trail(el: &web::HtmlElement, points: &[Vec2]) {
    let mut html = String::new();
    for (i, p) in points.iter().enumerate() {
        let t = i as f32 / TRAIL_LEN as f32;
        let size = 10.0 + t * 20.0;
        html.push_str(&format!(
            "<div class=\"trail-dot\" style=\"left:{:.0}px;top:{:.0}px;width:{:.0}px;height:{:.0}px;opacity:{:.2}\"></div>",
            p.x, p.y, size, size, t
        ));
    }
    el.set_inner_html(&html);
}

#[allow(deprecated)]
fn draw_ghost(ctx: &web::CanvasRenderingContext2d, w: f64, h: f64, phase: f64) {
    ctx.clear_rect(0.0, 0.0, w, h);
    if let Ok(body) = ctx.create_radial_gradient(w / 2.0, h / 3.0, 10.0, w / 2.0, h / 3.0, w / 2.0) {
        _ = body.add_color_stop(0.0, "rgba(200, 200, 255, 0.8)");
        _ = body.add_color_stop(0.5, "rgba(150, 150, 200, 0.4)");
        _ = body.add_color_stop(1.0, "rgba(100, 100, 150, 0)");
        ctx.set_fill_style(&JsValue::from(body));
    }
    ctx.begin_path();
    ctx.move_to(w / 2.0, h / 4.0);
    for i in 0..=10 {
        let a = PI * i as f64 / 10.0;
        ctx.line_to(w / 2.0 + a.cos() * w / 3.0, h / 4.0 + a.sin() * h / 2.5);
    }
    // Ragged hem
    let waves = 6;
    for i in 0..=waves {
        let x = w - i as f64 * w / waves as f64;
        ctx.line_to(x, h * 0.8 + (i as f64 + phase).sin() * 15.0);
    }
    ctx.close_path();
    ctx.fill();

    for dx in [-20.0, 20.0] {
        let (ex, ey) = (w / 2.0 + dx, h / 3.0);
        if let Ok(glow) = ctx.create_radial_gradient(ex, ey, 0.0, ex, ey, 15.0) {
            _ = glow.add_color_stop(0.0, "rgba(255, 100, 100, 1)");
            _ = glow.add_color_stop(1.0, "rgba(255, 100, 100, 0)");
            ctx.set_fill_style(&JsValue::from(glow));
        }
        ctx.begin_path();
        _ = ctx.arc(ex, ey, 8.0, 0.0, PI * 2.0);
        ctx.fill();
    }
}
