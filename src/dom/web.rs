//! `web_sys` implementation of the DOM seams.
//!
//! Requires a browser environment; compiled only with the `hydrate` feature.
//! Closures handed to the browser live inside the returned [`Subscription`]
//! and are released when it tears down.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, Document, EventTarget, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, PageTransitionEvent,
    Storage, Window,
};

use super::{
    DomEvent, DomNode, EventKind, FrameScheduler, Handler, Page, PreferenceStore, Subscription, Viewport,
    VisibilityChange, VisibilityHandler, VisibilityOptions,
};
use crate::error::WireError;

fn as_html(value: impl JsCast) -> Option<HtmlElement> {
    match value.dyn_into::<HtmlElement>() {
        Ok(el) => Some(el),
        Err(_) => None,
    }
}

fn listen_on(target: &EventTarget, kind: EventKind, mut handler: Handler) -> Result<Subscription, WireError> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
        let event = match raw.dyn_ref::<MouseEvent>() {
            Some(mouse) => DomEvent::at(kind, f64::from(mouse.client_x()), f64::from(mouse.client_y())),
            None => DomEvent::new(kind),
        };
        handler(&event);
        if event.default_prevented() {
            raw.prevent_default();
        }
    });
    target.add_event_listener_with_callback(kind.name(), closure.as_ref().unchecked_ref())?;
    let target = target.clone();
    Ok(Subscription::new(move || {
        if let Err(err) = target.remove_event_listener_with_callback(kind.name(), closure.as_ref().unchecked_ref()) {
            log::warn!("failed to remove {} listener: {}", kind.name(), WireError::from(err));
        }
    }))
}

impl DomNode for HtmlElement {
    fn id(&self) -> String {
        web_sys::Element::id(self)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), WireError> {
        web_sys::Element::set_attribute(self, name, value)?;
        Ok(())
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn set_class(&self, class: &str, present: bool) -> Result<(), WireError> {
        self.class_list().toggle_with_force(class, present)?;
        Ok(())
    }

    fn set_style_property(&self, name: &str, value: &str) -> Result<(), WireError> {
        self.style().set_property(name, value)?;
        Ok(())
    }

    fn offset_top(&self) -> f64 {
        f64::from(HtmlElement::offset_top(self))
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn value(&self) -> String {
        if let Some(input) = self.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = self.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = self.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn listen(&self, kind: EventKind, handler: Handler) -> Result<Subscription, WireError> {
        listen_on(self.as_ref(), kind, handler)
    }
}

impl PreferenceStore for Storage {
    fn get(&self, key: &str) -> Option<String> {
        match self.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("storage read of {key} failed: {}", WireError::from(err));
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WireError> {
        self.set_item(key, value)?;
        Ok(())
    }
}

/// `requestAnimationFrame` on the current window.
#[derive(Clone)]
pub struct AnimationFrames {
    window: Window,
}

impl FrameScheduler for AnimationFrames {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> Result<(), WireError> {
        let closure = Closure::once_into_js(move || callback());
        self.window.request_animation_frame(closure.unchecked_ref())?;
        Ok(())
    }
}

/// The browser window and its document.
#[derive(Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn current() -> Result<Self, WireError> {
        let window = web_sys::window().ok_or(WireError::MissingWindow)?;
        let document = window.document().ok_or(WireError::MissingWindow)?;
        Ok(Self { window, document })
    }

    /// Run `callback` once the DOM is parsed (immediately if it already is).
    pub fn on_ready(&self, callback: Box<dyn FnOnce()>) -> Result<(), WireError> {
        if self.document.ready_state() != "loading" {
            callback();
            return Ok(());
        }
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let closure = Closure::once_into_js(move || callback());
        self.document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            closure.unchecked_ref(),
            &options,
        )?;
        Ok(())
    }

    /// Run `callback` when the page is discarded. `pagehide` events that put
    /// the page into the back/forward cache are ignored.
    pub fn on_unload(&self, callback: Box<dyn FnOnce()>) -> Result<(), WireError> {
        let pending = RefCell::new(Some(callback));
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let cached = event.dyn_ref::<PageTransitionEvent>().is_some_and(PageTransitionEvent::persisted);
            if cached {
                return;
            }
            if let Some(callback) = pending.borrow_mut().take() {
                callback();
            }
        });
        self.window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

impl Page for WebPage {
    type Node = HtmlElement;
    type Store = Storage;
    type Frames = AnimationFrames;

    fn root(&self) -> Option<HtmlElement> {
        self.document.document_element().and_then(as_html)
    }

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document.get_element_by_id(id).and_then(as_html)
    }

    fn query_all(&self, selector: &str) -> Vec<HtmlElement> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("bad selector {selector:?}: {}", WireError::from(err));
                return Vec::new();
            }
        };
        (0..list.length()).filter_map(|i| list.get(i)).filter_map(as_html).collect()
    }

    fn create_element(&self, tag: &str) -> Result<HtmlElement, WireError> {
        let element = self.document.create_element(tag)?;
        as_html(element).ok_or_else(|| WireError::Js(format!("<{tag}> is not an HTML element")))
    }

    fn append_to_body(&self, node: &HtmlElement) -> Result<(), WireError> {
        let body = self.document.body().ok_or_else(|| WireError::Js("document has no body".to_owned()))?;
        body.append_child(node)?;
        Ok(())
    }

    fn storage(&self) -> Option<Storage> {
        match self.window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::debug!("local storage unavailable: {}", WireError::from(err));
                None
            }
        }
    }

    fn frames(&self) -> AnimationFrames {
        AnimationFrames { window: self.window.clone() }
    }

    fn matches_media(&self, query: &str) -> bool {
        match self.window.match_media(query) {
            Ok(list) => list.is_some_and(|mq| mq.matches()),
            Err(_) => false,
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        let read = |value: Result<JsValue, JsValue>| value.map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
        Viewport { width: read(self.window.inner_width()), height: read(self.window.inner_height()) }
    }

    fn navigate(&self, url: &str) -> Result<(), WireError> {
        self.window.location().set_href(url)?;
        Ok(())
    }

    fn listen_window(&self, kind: EventKind, handler: Handler) -> Result<Subscription, WireError> {
        listen_on(self.window.as_ref(), kind, handler)
    }

    fn supports_visibility_observer(&self) -> bool {
        js_sys::Reflect::has(self.window.as_ref(), &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }

    fn observe_visibility(
        &self,
        targets: &[HtmlElement],
        options: &VisibilityOptions,
        mut handler: VisibilityHandler,
    ) -> Result<Subscription, WireError> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let changes = entries
                    .iter()
                    .filter_map(|entry| {
                        let entry = entry.dyn_ref::<IntersectionObserverEntry>()?;
                        Some(VisibilityChange { target_id: entry.target().id(), intersecting: entry.is_intersecting() })
                    })
                    .collect::<Vec<_>>();
                handler(&changes);
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        let thresholds = options.thresholds.iter().map(|t| JsValue::from_f64(*t)).collect::<js_sys::Array>();
        init.set_threshold(&thresholds);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for target in targets {
            observer.observe(target);
        }
        Ok(Subscription::new(move || {
            observer.disconnect();
            drop(callback);
        }))
    }
}
