#![forbid(unsafe_code)]

//! Scroll-driven background visuals and ink bursts.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use rcloud_core::ink::{
    BurstSpec, BurstTrigger, InkBurstEffect, IntersectionEntry, Point, SectionRect, hues_from_css,
};
use rcloud_core::rng::RandomSource;
use rcloud_core::subscriptions::{EventKind, Subscriber, Subscriptions};
use rcloud_core::visual::{
    FrameRequest, PROP_HUE_A, PROP_HUE_B, PROP_HUE_C, ScrollMetrics, ScrollVisualEngine,
    ViewportEvent,
};
use rcloud_core::{MediaPreferences, SiteConfig, SiteError};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MediaQueryList, Window,
};

use crate::dom;

/// `Math.random()` as a [`RandomSource`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct JsRandom;

impl RandomSource for JsRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// Live media queries, re-sampled on every read.
#[derive(Clone)]
pub(crate) struct MediaQueries {
    mobile: Option<MediaQueryList>,
    reduced_motion: Option<MediaQueryList>,
}

impl MediaQueries {
    pub(crate) fn new(window: &Window, config: &SiteConfig) -> Self {
        let query = |q: &str| window.match_media(q).ok().flatten();
        Self {
            mobile: query(&config.mobile_query),
            reduced_motion: query(&config.reduced_motion_query),
        }
    }

    pub(crate) fn preferences(&self) -> MediaPreferences {
        MediaPreferences::new(
            self.mobile.as_ref().is_some_and(MediaQueryList::matches),
            self.reduced_motion.as_ref().is_some_and(MediaQueryList::matches),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll visuals
// ─────────────────────────────────────────────────────────────────────────────

struct VisualShared {
    window: Window,
    document: Document,
    media: MediaQueries,
    engine: RefCell<ScrollVisualEngine>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl VisualShared {
    fn metrics(&self) -> ScrollMetrics {
        let root = self.document.document_element();
        let root_height = root.as_ref().map_or(0, Element::scroll_height);
        let scroll_height = if root_height != 0 {
            root_height
        } else {
            self.document.body().map_or(0, |b| b.scroll_height())
        };
        let viewport_height = root.as_ref().map_or(0, Element::client_height);
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        ScrollMetrics::new(scroll_y, f64::from(scroll_height), f64::from(viewport_height))
    }

    fn recompute(&self, initial: bool) {
        let metrics = self.metrics();
        let prefs = self.media.preferences();
        let state = {
            let mut engine = self.engine.borrow_mut();
            if initial {
                engine.update(metrics, prefs)
            } else {
                engine.on_frame(metrics, prefs)
            }
        };
        let Some(root) = self.document.document_element() else {
            return;
        };
        if let Err(err) = dom::set_style(&root, state.css_properties()) {
            tracing::warn!(%err, "visual properties not applied");
        }
    }

    fn on_event(self: &Rc<Self>, event: ViewportEvent) {
        let request = self.engine.borrow_mut().handle(event);
        if request != FrameRequest::Schedule {
            return;
        }
        let shared = Rc::clone(self);
        let handle = request_animation_frame(move |_timestamp| {
            shared.frame.borrow_mut().take();
            shared.recompute(false);
        });
        *self.frame.borrow_mut() = Some(handle);
    }
}

/// Background hue/parallax engine bound to window events.
pub(crate) struct ScrollVisuals {
    shared: Rc<VisualShared>,
    subscriptions: Subscriptions,
    _listeners: Vec<EventListener>,
}

impl ScrollVisuals {
    pub(crate) fn attach(window: &Window, document: &Document, media: MediaQueries) -> Self {
        let mut subscriptions = Subscriptions::new();
        let mut engine = ScrollVisualEngine::new(media.preferences());
        engine.attach(&mut subscriptions);

        let shared = Rc::new(VisualShared {
            window: window.clone(),
            document: document.clone(),
            media,
            engine: RefCell::new(engine),
            frame: RefCell::new(None),
        });

        let listeners = subscriptions
            .iter()
            .filter(|(who, _, _)| *who == Subscriber::ScrollVisuals)
            .filter_map(|(_, kind, options)| {
                let name = kind.dom_name()?;
                let event = viewport_event(kind)?;
                let shared = Rc::clone(&shared);
                Some(EventListener::new_with_options(
                    window,
                    name,
                    EventListenerOptions {
                        phase: EventListenerPhase::Bubble,
                        passive: options.passive,
                    },
                    move |_event: &Event| shared.on_event(event),
                ))
            })
            .collect();

        shared.recompute(true);
        Self {
            shared,
            subscriptions,
            _listeners: listeners,
        }
    }

    pub(crate) fn detach(mut self) {
        self.shared
            .engine
            .borrow_mut()
            .detach(&mut self.subscriptions);
        self.shared.frame.borrow_mut().take();
    }
}

fn viewport_event(kind: EventKind) -> Option<ViewportEvent> {
    match kind {
        EventKind::Scroll => Some(ViewportEvent::Scroll),
        EventKind::Resize => Some(ViewportEvent::Resize),
        EventKind::OrientationChange => Some(ViewportEvent::OrientationChange),
        EventKind::Intersection => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ink bursts
// ─────────────────────────────────────────────────────────────────────────────

struct InkShared {
    window: Window,
    document: Document,
    layer: Element,
    media: MediaQueries,
    effect: InkBurstEffect,
}

impl InkShared {
    fn hues(&self) -> [f64; 3] {
        let style = self
            .document
            .document_element()
            .and_then(|root| self.window.get_computed_style(&root).ok().flatten());
        let read = |name: &str| {
            style
                .as_ref()
                .and_then(|s| s.get_property_value(name).ok())
                .unwrap_or_default()
        };
        hues_from_css(&read(PROP_HUE_A), &read(PROP_HUE_B), &read(PROP_HUE_C))
    }

    fn spawn(&self, at: Point) {
        let prefs = self.media.preferences();
        let Some(spec) = self.effect.spawn(at, self.hues(), prefs, &mut JsRandom) else {
            return;
        };
        if let Err(err) = self.insert(&spec) {
            tracing::warn!(%err, "ink burst not inserted");
        }
    }

    fn insert(&self, spec: &BurstSpec) -> Result<(), SiteError> {
        let burst = dom::create(&self.document, "div", "ink-burst")?;
        dom::set_style(&burst, spec.css_properties())?;
        dom::append(&self.layer, &burst)?;
        let lifetime = u32::try_from(self.effect.lifetime().as_millis()).unwrap_or(u32::MAX);
        Timeout::new(lifetime, move || burst.remove()).forget();
        Ok(())
    }

    fn on_entry(self: &Rc<Self>, entry: &IntersectionObserverEntry) {
        let rect = entry.target().get_bounding_client_rect();
        let entry = IntersectionEntry {
            is_intersecting: entry.is_intersecting(),
            rect: SectionRect::new(rect.left(), rect.top(), rect.width(), rect.height()),
        };
        let prefs = self.media.preferences();
        let Some(BurstTrigger { primary, duplicate }) =
            self.effect.on_intersection(entry, prefs, &mut JsRandom)
        else {
            return;
        };
        self.spawn(primary);
        if let Some((at, delay)) = duplicate {
            let shared = Rc::clone(self);
            let delay = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(delay, move || shared.spawn(at)).forget();
        }
    }
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Section observer spawning bursts into the `.fx-layer` container.
pub(crate) struct InkBursts {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl InkBursts {
    /// `Ok(None)` when the page has no fx layer.
    pub(crate) fn attach(
        window: &Window,
        document: &Document,
        media: MediaQueries,
        config: &SiteConfig,
    ) -> Result<Option<Self>, SiteError> {
        let Some(layer) = dom::query(document, &config.fx_layer_selector) else {
            return Ok(None);
        };
        let prefs = media.preferences();
        let mut effect = InkBurstEffect::new(prefs, config.timings);
        let mut subscriptions = Subscriptions::new();
        effect.attach(&mut subscriptions);

        let shared = Rc::new(InkShared {
            window: window.clone(),
            document: document.clone(),
            layer,
            media,
            effect,
        });

        let handler = Rc::clone(&shared);
        let callback: ObserverCallback = Closure::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        handler.on_entry(&entry);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&shared.effect.threshold().into());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom::js_error)?;
        let sections = dom::query_all(document, &config.section_selector);
        for section in &sections {
            observer.observe(section);
        }
        tracing::info!(
            sections = sections.len(),
            threshold = shared.effect.threshold(),
            "ink bursts attached"
        );
        Ok(Some(Self {
            observer,
            _callback: callback,
        }))
    }
}

impl Drop for InkBursts {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
