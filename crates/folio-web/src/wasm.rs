#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the folio page.
//!
//! This module wraps [`super::page_core::PageCore`] and applies its track
//! commands and effect styles to the live document. Only compiled on `wasm32`
//! targets.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use folio_core::effects::{
    ANCHOR_SELECTOR, HERO_SECTION_SELECTOR, HERO_TITLE_SELECTOR, NAV_LINK_SELECTOR,
    ParticleSpec, REVEAL_GROUPS, RIPPLE_KEYFRAMES, RIPPLE_TARGET_SELECTOR, Rect, RevealGroup,
    RevealTrigger, RippleGeometry, SECTION_SELECTOR, SectionBounds, StyleDecl, active_section,
    anchor_target, float_keyframes, link_style, link_target,
};
use folio_core::{
    ClonePlacement, EffectsConfig, GalleryDispatch, GalleryError, GalleryId, ResizeTicket,
    TrackCommand, TrackGeometry, TransitionMode, parse_translate_x,
};
use js_sys::{Array, Math, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Event, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent,
    NodeList, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Touch, TouchEvent,
    TransitionEvent, Window,
};
use web_time::Instant;

use super::page_core::PageCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn report(context: &str, err: &JsValue) {
    warn!(target: "folio_web::dom", context, error = ?err, "dom operation failed");
    console_error(&format!("{context}: {err:?}"));
}

fn ms_to_i32(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

fn listener_options(passive: bool, once: bool) -> AddEventListenerOptions {
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    options.set_once(once);
    options
}

/// Attach a page-lifetime listener.
fn listen(
    target: &EventTarget,
    event: &str,
    options: &AddEventListenerOptions,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        options,
    )?;
    closure.forget();
    Ok(())
}

fn set_timeout(window: &Window, ms: u32, f: impl FnOnce() + 'static) -> Result<i32, JsValue> {
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        ms_to_i32(ms),
    )
}

fn html_elements(list: &NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn apply_style(element: &HtmlElement, decls: &[StyleDecl]) -> Result<(), JsValue> {
    let style = element.style();
    for decl in decls {
        style.set_property(decl.property, &decl.value)?;
    }
    Ok(())
}

fn first_changed_touch(event: &Event) -> Option<Touch> {
    event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)
}

/// Only the track's own `transform` transition drives the loop.
fn is_track_transform(event: &Event, track: &HtmlElement) -> bool {
    let Some(transition) = event.dyn_ref::<TransitionEvent>() else {
        return false;
    };
    let track_target: &EventTarget = track.as_ref();
    event.target().as_ref() == Some(track_target) && transition.property_name() == "transform"
}

/// DOM handles for one carousel.
#[derive(Clone)]
struct GalleryDom {
    track: HtmlElement,
    /// Original items in document order, captured before cloning.
    originals: Vec<HtmlElement>,
}

impl GalleryDom {
    fn apply(&self, commands: &[TrackCommand], transition: &str) -> Result<(), JsValue> {
        let style = self.track.style();
        for command in commands {
            match command {
                TrackCommand::SetTransition(TransitionMode::Disabled) => {
                    style.set_property("transition", "none")?;
                }
                TrackCommand::SetTransition(TransitionMode::Enabled) => {
                    style.set_property("transition", transition)?;
                }
                TrackCommand::SetTransform { offset_px } => {
                    style.set_property("transform", &format!("translateX({offset_px}px)"))?;
                }
                TrackCommand::ForceReflow => {
                    let _ = self.track.offset_height();
                }
                TrackCommand::CloneItem { source, placement } => {
                    let Some(original) = self.originals.get(*source) else {
                        continue;
                    };
                    let clone = original.clone_node_with_deep(true)?;
                    match placement {
                        ClonePlacement::Append => {
                            self.track.append_child(&clone)?;
                        }
                        ClonePlacement::Prepend => {
                            let first = self.track.first_child();
                            self.track.insert_before(&clone, first.as_ref())?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn measure(&self, window: &Window, fallback_gap: f64) -> Option<TrackGeometry> {
        let first = self.originals.first()?;
        let gap = window
            .get_computed_style(&self.track)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("gap").ok())
            .unwrap_or_default();
        Some(TrackGeometry::from_css(
            f64::from(first.offset_width()),
            &gap,
            fallback_gap,
        ))
    }
}

/// Translation the track is rendered at right now, from its computed transform.
fn rendered_offset(window: &Window, track: &HtmlElement) -> Option<f64> {
    let transform = window
        .get_computed_style(track)
        .ok()
        .flatten()?
        .get_property_value("transform")
        .ok()?;
    parse_translate_x(&transform)
}

struct Shared {
    window: Window,
    document: Document,
    core: RefCell<PageCore>,
    galleries: RefCell<HashMap<String, GalleryDom>>,
    epoch: Instant,
    resize_timer: Cell<Option<i32>>,
    resize_bound: Cell<bool>,
    mounted: Cell<bool>,
}

impl Shared {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    fn html(&self, selector: &str) -> Option<HtmlElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn effects(&self) -> EffectsConfig {
        self.core.borrow().config().effects.clone()
    }

    /// Apply a dispatch's commands. The core must not be borrowed.
    fn apply(&self, dispatch: &GalleryDispatch) {
        if dispatch.commands.is_empty() {
            return;
        }
        let Some(id) = dispatch.log.gallery.as_ref() else {
            return;
        };
        let Some(dom) = self.galleries.borrow().get(id.as_str()).cloned() else {
            return;
        };
        let transition = self.core.borrow().config().gallery.transition.clone();
        if let Err(err) = dom.apply(&dispatch.commands, &transition) {
            report("gallery commands", &err);
        }
    }

    fn apply_opt(&self, dispatch: Option<&GalleryDispatch>) {
        if let Some(dispatch) = dispatch {
            self.apply(dispatch);
        }
    }

    fn skip_gallery(&self, err: &GalleryError) {
        warn!(target: "folio_web::dom", error = %err, "gallery skipped");
        console_error(&err.to_string());
        self.core
            .borrow_mut()
            .push_log(format!("gallery_init_error: {err}"));
    }

    fn init_gallery(self: &Rc<Self>, container_id: &str) -> bool {
        if self.core.borrow().is_initialized(container_id) {
            return true;
        }
        let Some(wrapper) = self
            .document
            .get_element_by_id(container_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            self.skip_gallery(&GalleryError::MissingContainer {
                id: container_id.to_owned(),
            });
            return false;
        };
        let (track_selector, item_selector, fallback_gap) = {
            let core = self.core.borrow();
            let gallery = &core.config().gallery;
            (
                gallery.track_selector.clone(),
                gallery.item_selector.clone(),
                gallery.fallback_gap_px,
            )
        };
        let Some(track) = wrapper
            .query_selector(&track_selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            self.skip_gallery(&GalleryError::MissingTrack {
                id: container_id.to_owned(),
            });
            return false;
        };
        let originals = match track.query_selector_all(&item_selector) {
            Ok(list) => html_elements(&list),
            Err(err) => {
                report("gallery items", &err);
                Vec::new()
            }
        };
        let dom = GalleryDom {
            track: track.clone(),
            originals,
        };

        let loaded = self.document.ready_state() == "complete";
        let geometry = if loaded {
            dom.measure(&self.window, fallback_gap)
        } else {
            None
        };
        let item_count = dom.originals.len();
        let Some(dispatch) = self
            .core
            .borrow_mut()
            .init_gallery(container_id, item_count, geometry)
        else {
            console_error(&format!("gallery has no items: {container_id}"));
            return false;
        };

        let id = GalleryId::from_container_id(container_id).as_str().to_owned();
        self.galleries.borrow_mut().insert(id.clone(), dom);
        self.apply(&dispatch);
        if let Err(err) = self.bind_gallery(&id, &wrapper, &track) {
            report("gallery listeners", &err);
        }
        if !loaded {
            let shared = Rc::clone(self);
            let load_id = id.clone();
            if let Err(err) = listen(
                &self.window,
                "load",
                &listener_options(false, true),
                move |_| shared.complete_geometry(&load_id),
            ) {
                report("load listener", &err);
            }
        }
        if let Err(err) = self.bind_resize() {
            report("resize listener", &err);
        }
        debug!(
            target: "folio_web::dom",
            gallery = id.as_str(),
            items = item_count,
            loaded,
            "gallery mounted"
        );
        true
    }

    fn bind_gallery(
        self: &Rc<Self>,
        id: &str,
        wrapper: &HtmlElement,
        track: &HtmlElement,
    ) -> Result<(), JsValue> {
        let passive = listener_options(true, false);
        let active = listener_options(false, false);

        let shared = Rc::clone(self);
        let gid = id.to_owned();
        listen(wrapper, "touchstart", &passive, move |event| {
            let Some(touch) = first_changed_touch(&event) else {
                return;
            };
            let at = shared.now_ms();
            let dispatch = {
                let mut core = shared.core.borrow_mut();
                core.swipe_start(&gid, f64::from(touch.screen_x()));
                core.touch_start(&gid, f64::from(touch.client_x()), at)
            };
            shared.apply_opt(dispatch.as_ref());
        })?;

        let shared = Rc::clone(self);
        let gid = id.to_owned();
        listen(wrapper, "touchmove", &passive, move |event| {
            let Some(touch) = first_changed_touch(&event) else {
                return;
            };
            let dispatch = shared
                .core
                .borrow_mut()
                .touch_move(&gid, f64::from(touch.client_x()));
            shared.apply_opt(dispatch.as_ref());
        })?;

        let shared = Rc::clone(self);
        let gid = id.to_owned();
        listen(wrapper, "touchend", &active, move |event| {
            let at = shared.now_ms();
            let (fine, coarse) = {
                let mut core = shared.core.borrow_mut();
                let fine = core.touch_end(&gid, at);
                let coarse = first_changed_touch(&event)
                    .and_then(|touch| core.swipe_end(&gid, f64::from(touch.screen_x())));
                (fine, coarse)
            };
            shared.apply(&fine);
            shared.apply_opt(coarse.as_ref());
        })?;

        let shared = Rc::clone(self);
        let gid = id.to_owned();
        listen(wrapper, "touchcancel", &passive, move |_| {
            let dispatch = shared.core.borrow_mut().touch_cancel(&gid);
            shared.apply(&dispatch);
        })?;

        let shared = Rc::clone(self);
        let gid = id.to_owned();
        let own_track = track.clone();
        listen(track, "transitionend", &passive, move |event| {
            if !is_track_transform(&event, &own_track) {
                return;
            }
            let observed = rendered_offset(&shared.window, &own_track);
            let dispatch = shared.core.borrow_mut().transition_end(&gid, observed);
            shared.apply_opt(dispatch.as_ref());
        })?;

        let shared = Rc::clone(self);
        let gid = id.to_owned();
        let own_track = track.clone();
        listen(track, "transitioncancel", &passive, move |event| {
            if !is_track_transform(&event, &own_track) {
                return;
            }
            let observed = rendered_offset(&shared.window, &own_track);
            let dispatch = shared.core.borrow_mut().transition_cancel(&gid, observed);
            shared.apply(&dispatch);
        })
    }

    fn complete_geometry(&self, id: &str) {
        let Some(dom) = self.galleries.borrow().get(id).cloned() else {
            return;
        };
        let fallback_gap = self.core.borrow().config().gallery.fallback_gap_px;
        let Some(geometry) = dom.measure(&self.window, fallback_gap) else {
            return;
        };
        let dispatch = self.core.borrow_mut().geometry_ready(id, geometry);
        self.apply(&dispatch);
    }

    fn bind_resize(self: &Rc<Self>) -> Result<(), JsValue> {
        if self.resize_bound.replace(true) {
            return Ok(());
        }
        let shared = Rc::clone(self);
        listen(
            &self.window,
            "resize",
            &listener_options(true, false),
            move |_| shared.schedule_resize(),
        )
    }

    fn schedule_resize(self: &Rc<Self>) {
        let ticket = self.core.borrow_mut().request_resize();
        if let Some(handle) = self.resize_timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let delay = u32::try_from(ticket.delay.as_millis()).unwrap_or(u32::MAX);
        let shared = Rc::clone(self);
        match set_timeout(&self.window, delay, move || shared.fire_resize(ticket)) {
            Ok(handle) => self.resize_timer.set(Some(handle)),
            Err(err) => report("resize timer", &err),
        }
    }

    fn fire_resize(&self, ticket: ResizeTicket) {
        self.resize_timer.set(None);
        let fallback_gap = self.core.borrow().config().gallery.fallback_gap_px;
        let dispatches = {
            let galleries = self.galleries.borrow();
            self.core.borrow_mut().fire_resize(ticket, |id| {
                galleries
                    .get(id.as_str())
                    .and_then(|dom| dom.measure(&self.window, fallback_gap))
            })
        };
        for dispatch in &dispatches {
            self.apply(dispatch);
        }
    }

    fn mount(self: &Rc<Self>) -> Result<(), JsValue> {
        if self.mounted.replace(true) {
            return Ok(());
        }
        self.inject_keyframes()?;
        self.bind_smooth_anchors()?;
        self.bind_reveal()?;
        let container_ids = self.core.borrow().config().gallery.container_ids.clone();
        for container_id in &container_ids {
            let _ = self.init_gallery(container_id);
        }
        self.bind_scroll_effects()?;
        self.bind_ripples()?;
        self.start_particles()?;
        Ok(())
    }

    fn inject_keyframes(&self) -> Result<(), JsValue> {
        let Some(head) = self.document.head() else {
            return Ok(());
        };
        let style = self.document.create_element("style")?;
        let css = format!("{RIPPLE_KEYFRAMES}{}", float_keyframes(Math::random()));
        style.set_text_content(Some(&css));
        head.append_child(&style)?;
        Ok(())
    }

    fn bind_smooth_anchors(&self) -> Result<(), JsValue> {
        let anchors = self.document.query_selector_all(ANCHOR_SELECTOR)?;
        for anchor in html_elements(&anchors) {
            let document = self.document.clone();
            let link = anchor.clone();
            listen(&anchor, "click", &listener_options(false, false), move |event| {
                event.prevent_default();
                let href = link.get_attribute("href").unwrap_or_default();
                let Some(selector) = anchor_target(&href) else {
                    return;
                };
                if let Ok(Some(target)) = document.query_selector(selector) {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Start);
                    target.scroll_into_view_with_scroll_into_view_options(&options);
                }
            })?;
        }
        Ok(())
    }

    fn bind_reveal(&self) -> Result<(), JsValue> {
        let effects = self.effects();
        for group in REVEAL_GROUPS {
            let elements = html_elements(&self.document.query_selector_all(group.selector)?);
            if elements.is_empty() {
                continue;
            }
            for (index, element) in elements.iter().enumerate() {
                apply_style(element, &group.initial_style(index))?;
            }
            match group.trigger {
                RevealTrigger::Intersection => {
                    let observer = reveal_observer(group, &effects)?;
                    for element in &elements {
                        observer.observe(element);
                    }
                }
                RevealTrigger::Timer => {
                    let revealed = group.revealed_style();
                    set_timeout(&self.window, effects.gallery_section_delay_ms, move || {
                        for element in &elements {
                            if let Err(err) = apply_style(element, &revealed) {
                                report("reveal", &err);
                            }
                        }
                    })?;
                }
            }
        }
        Ok(())
    }

    fn bind_scroll_effects(self: &Rc<Self>) -> Result<(), JsValue> {
        self.update_active_link();
        let shared = Rc::clone(self);
        listen(
            &self.window,
            "scroll",
            &listener_options(true, false),
            move |_| {
                shared.schedule_parallax();
                shared.update_active_link();
            },
        )
    }

    fn schedule_parallax(self: &Rc<Self>) {
        if !self.core.borrow_mut().request_parallax_frame() {
            return;
        }
        let shared = Rc::clone(self);
        let frame = Closure::once_into_js(move || shared.parallax_frame());
        if let Err(err) = self.window.request_animation_frame(frame.unchecked_ref()) {
            report("parallax frame", &err);
            self.parallax_frame();
        }
    }

    fn parallax_frame(&self) {
        let scrolled = self.window.scroll_y().unwrap_or(0.0);
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0);
        let frame = self
            .core
            .borrow_mut()
            .parallax_frame(scrolled, viewport_height);
        let Some(frame) = frame else {
            return;
        };
        let (Some(title), Some(hero)) = (
            self.html(HERO_TITLE_SELECTOR),
            self.html(HERO_SECTION_SELECTOR),
        ) else {
            return;
        };
        if let Err(err) = apply_style(&title, &frame.title_style())
            .and_then(|()| apply_style(&hero, &frame.hero_style()))
        {
            report("parallax", &err);
        }
    }

    fn update_active_link(&self) {
        let offset = self.core.borrow().config().effects.nav_offset_px;
        let Ok(sections) = self.document.query_selector_all(SECTION_SELECTOR) else {
            return;
        };
        let bounds: Vec<SectionBounds> = html_elements(&sections)
            .iter()
            .map(|section| SectionBounds {
                id: section.id(),
                top: f64::from(section.offset_top()),
                height: f64::from(section.client_height()),
            })
            .collect();
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let current = active_section(&bounds, scroll_y, offset);
        let Ok(links) = self.document.query_selector_all(NAV_LINK_SELECTOR) else {
            return;
        };
        for link in html_elements(&links) {
            let href = link.get_attribute("href").unwrap_or_default();
            let active = current.is_some_and(|id| link_target(&href) == id);
            if let Err(err) = apply_style(&link, &link_style(active)) {
                report("active nav", &err);
            }
        }
    }

    fn bind_ripples(self: &Rc<Self>) -> Result<(), JsValue> {
        let lifetime_ms = self.effects().ripple_lifetime_ms;
        let targets = self.document.query_selector_all(RIPPLE_TARGET_SELECTOR)?;
        for target in html_elements(&targets) {
            let style = target.style();
            style.set_property("position", "relative")?;
            style.set_property("cursor", "pointer")?;
            let shared = Rc::clone(self);
            let element = target.clone();
            listen(&target, "click", &listener_options(false, false), move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if let Err(err) = shared.spawn_ripple(&element, mouse, lifetime_ms) {
                    report("ripple", &err);
                }
            })?;
        }
        Ok(())
    }

    fn spawn_ripple(
        &self,
        element: &HtmlElement,
        event: &MouseEvent,
        lifetime_ms: u32,
    ) -> Result<(), JsValue> {
        let bounds = element.get_bounding_client_rect();
        let geometry = RippleGeometry::compute(
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            Rect {
                left: bounds.x(),
                top: bounds.y(),
                width: bounds.width(),
                height: bounds.height(),
            },
        );
        let ripple: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        apply_style(&ripple, &geometry.style(lifetime_ms))?;
        element.append_child(&ripple)?;
        set_timeout(&self.window, lifetime_ms, move || ripple.remove())?;
        Ok(())
    }

    fn start_particles(self: &Rc<Self>) -> Result<(), JsValue> {
        let effects = self.effects();
        let lifetime_ms = effects.particle_lifetime_ms;
        let shared = Rc::clone(self);
        let tick = Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = shared.spawn_particle(lifetime_ms) {
                report("particle", &err);
            }
        });
        self.window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                ms_to_i32(effects.particle_interval_ms),
            )?;
        tick.forget();
        Ok(())
    }

    fn spawn_particle(&self, lifetime_ms: u32) -> Result<(), JsValue> {
        let Some(hero) = self.html(HERO_SECTION_SELECTOR) else {
            return Ok(());
        };
        let spec = ParticleSpec::from_samples(Math::random(), Math::random(), Math::random());
        let particle: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        apply_style(&particle, &spec.style())?;
        hero.append_child(&particle)?;
        set_timeout(&self.window, lifetime_ms, move || particle.remove())?;
        Ok(())
    }
}

fn reveal_observer(
    group: RevealGroup,
    effects: &EffectsConfig,
) -> Result<IntersectionObserver, JsValue> {
    let revealed = group.revealed_style();
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                if let Ok(target) = entry.target().dyn_into::<HtmlElement>() {
                    if let Err(err) = apply_style(&target, &revealed) {
                        report("reveal", &err);
                    }
                }
            }
        },
    );
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(effects.reveal_threshold));
    init.set_root_margin(&effects.reveal_root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    Ok(observer)
}

/// The folio page: gallery carousels plus decorative effects.
///
/// Host-driven: construct once, call `mount()` after `DOMContentLoaded`.
#[wasm_bindgen]
pub struct FolioPage {
    shared: Rc<Shared>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl FolioPage {
    /// Create a page from an optional (partial) JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FolioPage, JsValue> {
        install_panic_hook();
        let core = PageCore::from_json(config_json.as_deref())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            shared: Rc::new(Shared {
                window,
                document,
                core: RefCell::new(core),
                galleries: RefCell::new(HashMap::new()),
                epoch: Instant::now(),
                resize_timer: Cell::new(None),
                resize_bound: Cell::new(false),
                mounted: Cell::new(false),
            }),
        })
    }

    /// Set up page effects and every configured gallery. Runs once.
    pub fn mount(&self) -> Result<(), JsValue> {
        self.shared.mount()
    }

    /// Set up one gallery container. `true` if it is (or already was) ready.
    #[wasm_bindgen(js_name = initGalleryInfinite)]
    pub fn init_gallery_infinite(&self, container_id: &str) -> bool {
        self.shared.init_gallery(container_id)
    }

    /// Slide gallery `id` one item; `direction` sign picks the way.
    #[wasm_bindgen(js_name = scrollGallery)]
    pub fn scroll_gallery(&self, id: &str, direction: i32) -> bool {
        let dispatch = self.shared.core.borrow_mut().scroll_gallery(id, direction);
        match dispatch {
            Some(dispatch) => {
                self.shared.apply(&dispatch);
                dispatch.accepted()
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = galleryIndex)]
    pub fn gallery_index(&self, id: &str) -> Option<u32> {
        self.shared
            .core
            .borrow()
            .gallery_index(id)
            .and_then(|index| u32::try_from(index).ok())
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self, id: &str) -> bool {
        self.shared.core.borrow().is_animating(id)
    }

    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.shared
            .core
            .borrow()
            .config_json()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Drain structured log lines.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&self) -> Array {
        let logs = Array::new();
        for line in self.shared.core.borrow_mut().take_logs() {
            logs.push(&JsValue::from_str(&line));
        }
        logs
    }
}
