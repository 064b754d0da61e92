#![forbid(unsafe_code)]

//! DOM host and the JS-facing `WebCarousel`.
//!
//! Expected markup:
//!
//! ```html
//! <div class="glissade" data-auto-slide="true">
//!   <button class="glissade-prev"></button>
//!   <div class="glissade-frame">
//!     <ul class="glissade-slides">
//!       <li class="glissade-slide">...</li>
//!     </ul>
//!   </div>
//!   <button class="glissade-next"></button>
//! </div>
//! ```
//!
//! Every browser callback re-enters the carousel through a `Weak` handle and
//! `try_borrow_mut`, so a callback raised while another handler is running
//! is dropped with a warning instead of panicking.

use core::fmt;
use core::time::Duration;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glissade_core::host::{
    ButtonIndicator, CarouselHost, GeometryProvider, StyleApplier, TimerScheduler,
};
use glissade_core::{
    Carousel, MoveGeneration, SlideGeometry, TimerToken, Transition, TriggerOutcome,
};
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlElement, TouchEvent, Window};

use crate::css::{self, DISABLED_CLASS, TRANSITION_END_EVENTS, TRANSITION_PROPERTIES};
use crate::layout;
use crate::options;

const FRAME_SELECTOR: &str = ".glissade-frame";
const LIST_SELECTOR: &str = ".glissade-slides";
const SLIDE_SELECTOR: &str = ".glissade-slide";
const NEXT_SELECTOR: &str = ".glissade-next";
const PREV_SELECTOR: &str = ".glissade-prev";

type Shared = Rc<RefCell<Carousel<WebHost>>>;
type WeakShared = Weak<RefCell<Carousel<WebHost>>>;

/// DOM adapter error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A required element was not found.
    Missing(&'static str),
    /// An element exists but is not an `HTMLElement`.
    NotHtml(&'static str),
    /// `window` is unavailable (worker or non-browser host).
    NoWindow,
    /// A DOM call threw.
    Js(String),
}

impl DomError {
    fn js(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(sel) => write!(f, "missing element {sel}"),
            Self::NotHtml(sel) => write!(f, "element {sel} is not an HTMLElement"),
            Self::NoWindow => f.write_str("no window"),
            Self::Js(msg) => write!(f, "DOM call failed: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

impl From<DomError> for JsValue {
    fn from(e: DomError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

fn find(root: &HtmlElement, selector: &'static str) -> Result<Option<HtmlElement>, DomError> {
    match root.query_selector(selector).map_err(DomError::js)? {
        Some(el) => el
            .dyn_into::<HtmlElement>()
            .map(Some)
            .map_err(|_| DomError::NotHtml(selector)),
        None => Ok(None),
    }
}

fn require(root: &HtmlElement, selector: &'static str) -> Result<HtmlElement, DomError> {
    find(root, selector)?.ok_or(DomError::Missing(selector))
}

fn with_carousel<F>(weak: &WeakShared, trigger: &'static str, f: F)
where
    F: FnOnce(&mut Carousel<WebHost>),
{
    let Some(shared) = weak.upgrade() else {
        return;
    };
    match shared.try_borrow_mut() {
        Ok(mut carousel) => f(&mut carousel),
        Err(_) => warn!(trigger, "carousel busy with another callback; event dropped"),
    };
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Measures the root, slides, and buttons.
pub struct DomGeometry {
    root: HtmlElement,
    list: HtmlElement,
    button: Option<HtmlElement>,
}

impl GeometryProvider for DomGeometry {
    type Error = DomError;

    fn measure(&mut self) -> Result<SlideGeometry, DomError> {
        let slides = self
            .list
            .query_selector_all(SLIDE_SELECTOR)
            .map_err(DomError::js)?;
        let first = slides
            .item(0)
            .ok_or(DomError::Missing(SLIDE_SELECTOR))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::NotHtml(SLIDE_SELECTOR))?;
        let button_width = self.button.as_ref().map(|b| f64::from(b.offset_width()));
        Ok(layout::build_geometry(
            f64::from(first.offset_width()),
            f64::from(self.root.offset_width()),
            slides.length(),
            button_width,
        ))
    }
}

/// Writes margin transitions on the slide list and listens for completion.
pub struct DomStyle {
    list: HtmlElement,
    carousel: WeakShared,
    listener: Option<Closure<dyn FnMut(Event)>>,
    retired: Vec<Closure<dyn FnMut(Event)>>,
}

impl DomStyle {
    fn detach_listener(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        let target: &EventTarget = self.list.as_ref();
        for name in TRANSITION_END_EVENTS {
            let _ = target.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
        // The listener may be the closure currently executing; drop it later.
        self.retired.push(listener);
    }
}

impl StyleApplier for DomStyle {
    type Error = DomError;

    fn apply(&mut self, transition: &Transition) -> Result<(), DomError> {
        self.retired.clear();
        self.detach_listener();

        let generation = transition.generation;
        let weak = self.carousel.clone();
        let list_target: EventTarget = self.list.clone().into();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if event.target().as_ref() != Some(&list_target) {
                return;
            }
            with_carousel(&weak, "transitionend", |c| {
                c.on_transition_end(generation);
            });
        });

        let target: &EventTarget = self.list.as_ref();
        for name in TRANSITION_END_EVENTS {
            target
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .map_err(DomError::js)?;
        }
        self.listener = Some(listener);

        let style = self.list.style();
        for (prop, value) in css::transition_declarations(transition) {
            style.set_property(prop, &value).map_err(DomError::js)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DomError> {
        let style = self.list.style();
        for prop in TRANSITION_PROPERTIES {
            style.remove_property(prop).map_err(DomError::js)?;
        }
        Ok(())
    }
}

/// Toggles the disabled class on the controls. Absent controls are skipped.
pub struct DomButtons {
    next: Option<HtmlElement>,
    prev: Option<HtmlElement>,
}

impl DomButtons {
    fn set(button: Option<&HtmlElement>, enabled: bool) {
        let Some(button) = button else {
            return;
        };
        if let Err(err) = button.class_list().toggle_with_force(DISABLED_CLASS, !enabled) {
            warn!(error = %DomError::js(err), enabled, "failed to toggle disabled class");
        }
        let aria = if enabled { "false" } else { "true" };
        if let Err(err) = button.set_attribute("aria-disabled", aria) {
            warn!(error = %DomError::js(err), enabled, "failed to set aria-disabled");
        }
    }
}

impl ButtonIndicator for DomButtons {
    fn update(&mut self, can_go_forward: bool, can_go_backward: bool) {
        Self::set(self.next.as_ref(), can_go_forward);
        Self::set(self.prev.as_ref(), can_go_backward);
    }
}

/// `setTimeout`-backed scheduler.
pub struct DomTimers {
    window: Window,
    carousel: WeakShared,
    current: Option<(TimerToken, i32, Closure<dyn FnMut()>)>,
    retired: Vec<Closure<dyn FnMut()>>,
}

impl DomTimers {
    fn retire_current(&mut self) -> Option<(TimerToken, i32)> {
        let (token, handle, closure) = self.current.take()?;
        // The closure may be the one currently firing; drop it on the next schedule.
        self.retired.push(closure);
        Some((token, handle))
    }
}

impl TimerScheduler for DomTimers {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        // A synchronous settle can reschedule from inside the firing closure,
        // which was retired moments ago; keep the newest retiree alive.
        let keep = self.retired.len().saturating_sub(1);
        self.retired.drain(..keep);
        if let Some((_, handle)) = self.retire_current() {
            self.window.clear_timeout_with_handle(handle);
        }

        let weak = self.carousel.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            with_carousel(&weak, "timer", |c| {
                c.on_timer_fired(token);
            });
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => self.current = Some((token, handle, closure)),
            Err(err) => warn!(error = %DomError::js(err), %token, "setTimeout failed"),
        }
    }

    fn cancel(&mut self, token: TimerToken) {
        if self.current.as_ref().is_some_and(|(t, _, _)| *t == token) {
            if let Some((_, handle)) = self.retire_current() {
                self.window.clear_timeout_with_handle(handle);
            }
        }
    }
}

/// DOM-backed host.
pub struct WebHost {
    geometry: DomGeometry,
    style: DomStyle,
    buttons: DomButtons,
    timers: DomTimers,
}

impl CarouselHost for WebHost {
    type Geometry = DomGeometry;
    type Style = DomStyle;
    type Buttons = DomButtons;
    type Timers = DomTimers;

    fn geometry(&mut self) -> &mut DomGeometry {
        &mut self.geometry
    }

    fn style(&mut self) -> &mut DomStyle {
        &mut self.style
    }

    fn buttons(&mut self) -> &mut DomButtons {
        &mut self.buttons
    }

    fn timers(&mut self) -> &mut DomTimers {
        &mut self.timers
    }
}

// ---------------------------------------------------------------------------
// JS surface
// ---------------------------------------------------------------------------

struct Listener {
    target: EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        name: &'static str,
        passive: bool,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, DomError> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(DomError::js)?;
        Ok(Self {
            target,
            name,
            closure,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref());
    }
}

fn simple_trigger(
    weak: &WeakShared,
    trigger: &'static str,
    f: fn(&mut Carousel<WebHost>) -> TriggerOutcome,
) -> Closure<dyn FnMut(Event)> {
    let weak = weak.clone();
    Closure::new(move |_: Event| {
        with_carousel(&weak, trigger, |c| {
            let outcome = f(c);
            trace!(trigger, ?outcome, "handled");
        });
    })
}

fn first_touch_x(event: &Event) -> Option<(usize, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?;
    let touches = touch.touches();
    let count = touches.length() as usize;
    let x = touches.get(0).map_or(0.0, |t| f64::from(t.client_x()));
    Some((count, x))
}

/// A carousel bound to one root element.
#[wasm_bindgen]
pub struct WebCarousel {
    shared: Shared,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl WebCarousel {
    /// Discover the carousel under `root`, read its `data-*` options, and
    /// wire click, touch, and resize listeners.
    #[wasm_bindgen(constructor)]
    pub fn new(root: HtmlElement) -> Result<WebCarousel, JsValue> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        let frame = require(&root, FRAME_SELECTOR)?;
        let list = require(&frame, LIST_SELECTOR)?;
        let next = find(&root, NEXT_SELECTOR)?;
        let prev = find(&root, PREV_SELECTOR)?;
        let config = options::config_from_attributes(|name| root.get_attribute(name))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let shared: Shared = Rc::new_cyclic(|weak: &WeakShared| {
            let host = WebHost {
                geometry: DomGeometry {
                    root: root.clone(),
                    list: list.clone(),
                    button: next.clone().or_else(|| prev.clone()),
                },
                style: DomStyle {
                    list: list.clone(),
                    carousel: weak.clone(),
                    listener: None,
                    retired: Vec::new(),
                },
                buttons: DomButtons {
                    next: next.clone(),
                    prev: prev.clone(),
                },
                timers: DomTimers {
                    window: window.clone(),
                    carousel: weak.clone(),
                    current: None,
                    retired: Vec::new(),
                },
            };
            RefCell::new(Carousel::new(host, config))
        });

        let mut listeners = Vec::new();
        let weak = Rc::downgrade(&shared);

        if let Some(next) = next {
            let handler = simple_trigger(&weak, "next", Carousel::next);
            listeners.push(Listener::attach(next.into(), "click", true, handler)?);
        }
        if let Some(prev) = prev {
            let handler = simple_trigger(&weak, "previous", Carousel::previous);
            listeners.push(Listener::attach(prev.into(), "click", true, handler)?);
        }

        let frame_target: EventTarget = frame.into();
        let w = weak.clone();
        let touch_start = Closure::new(move |event: Event| {
            if let Some((count, x)) = first_touch_x(&event) {
                with_carousel(&w, "touchstart", |c| {
                    let _ = c.on_touch_start(count, x);
                });
            }
        });
        listeners.push(Listener::attach(frame_target.clone(), "touchstart", true, touch_start)?);

        // Non-passive so a horizontal swipe can suppress page scroll.
        let w = weak.clone();
        let touch_move = Closure::new(move |event: Event| {
            if let Some((count, x)) = first_touch_x(&event) {
                with_carousel(&w, "touchmove", |c| {
                    if c.on_touch_move(count, x) {
                        event.prevent_default();
                    }
                });
            }
        });
        listeners.push(Listener::attach(frame_target.clone(), "touchmove", false, touch_move)?);

        let handler = simple_trigger(&weak, "touchend", Carousel::on_touch_end);
        listeners.push(Listener::attach(frame_target.clone(), "touchend", true, handler)?);
        let handler = simple_trigger(&weak, "touchcancel", Carousel::on_touch_cancel);
        listeners.push(Listener::attach(frame_target, "touchcancel", true, handler)?);
        let handler = simple_trigger(&weak, "resize", Carousel::on_resize);
        listeners.push(Listener::attach(window.into(), "resize", true, handler)?);

        debug!(listeners = listeners.len(), "web carousel wired");
        Ok(WebCarousel { shared, listeners })
    }

    /// Advance one slide. Returns `true` if a move started.
    pub fn next(&self) -> bool {
        self.shared.borrow_mut().next().moved()
    }

    /// Go back one slide. Returns `true` if a move started.
    pub fn previous(&self) -> bool {
        self.shared.borrow_mut().previous().moved()
    }

    /// Slides advanced so far.
    #[wasm_bindgen(js_name = getAdvancedCount)]
    pub fn advanced_count(&self) -> u32 {
        self.shared.borrow().advanced_count()
    }

    /// Re-measure after an external layout change.
    pub fn resize(&self) {
        self.shared.borrow_mut().on_resize();
    }

    /// Remove listeners and cancel the auto-advance timer.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        self.shared.borrow_mut().teardown();
    }

    /// Generation of the transition in flight, or `undefined`.
    #[wasm_bindgen(js_name = inFlightGeneration)]
    pub fn in_flight_generation(&self) -> Option<f64> {
        // JS numbers are f64; generations stay far below 2^53.
        self.shared.borrow().in_flight().map(|g| g.get() as f64)
    }

    /// Deliver a completion signal for `generation` from host-side code.
    #[wasm_bindgen(js_name = transitionEnd)]
    pub fn transition_end(&self, generation: f64) {
        let generation = MoveGeneration::from_raw(generation as u64);
        self.shared.borrow_mut().on_transition_end(generation);
    }
}
