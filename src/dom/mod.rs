//! Browser seams the page features are written against.
//!
//! SYSTEM CONTEXT
//! ==============
//! Features only see [`Page`] (window + document), [`DomNode`] (one element),
//! [`PreferenceStore`] (local storage) and [`FrameScheduler`]
//! (`requestAnimationFrame`). The `hydrate` build implements them over
//! `web_sys` in [`web`]; unit tests implement them in memory in `fixture`.
//!
//! Listener registration always yields a [`Subscription`]; dropping it
//! removes the listener, so an [`crate::App`] tears down deterministically.

#[cfg(test)]
pub mod fixture;
pub mod subscription;
#[cfg(feature = "hydrate")]
pub mod web;

pub use subscription::Subscription;

use crate::error::WireError;

/// DOM events the features listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    PointerMove,
    PointerLeave,
}

impl EventKind {
    /// The DOM event type string.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Scroll => "scroll",
            Self::PointerMove => "pointermove",
            Self::PointerLeave => "pointerleave",
        }
    }
}

/// Browser-independent view of a dispatched event.
///
/// Handlers call [`DomEvent::prevent_default`]; the backend forwards the
/// request to the real event after the handler returns.
#[derive(Debug)]
pub struct DomEvent {
    pub kind: EventKind,
    pub client_x: f64,
    pub client_y: f64,
    default_prevented: std::cell::Cell<bool>,
}

impl DomEvent {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self::at(kind, 0.0, 0.0)
    }

    /// An event carrying viewport pointer coordinates.
    #[must_use]
    pub fn at(kind: EventKind, client_x: f64, client_y: f64) -> Self {
        Self { kind, client_x, client_y, default_prevented: std::cell::Cell::new(false) }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Boxed event callback.
pub type Handler = Box<dyn FnMut(&DomEvent)>;

/// Boxed visibility-observer callback, invoked with one batch of changes.
pub type VisibilityHandler = Box<dyn FnMut(&[VisibilityChange])>;

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// One entry delivered by a visibility observer.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityChange {
    /// `id` of the observed element.
    pub target_id: String,
    /// Whether the element currently intersects the observer's root band.
    pub intersecting: bool,
}

/// Options for [`Page::observe_visibility`], mirroring `IntersectionObserverInit`.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityOptions {
    pub root_margin: String,
    pub thresholds: Vec<f64>,
}

/// A single DOM element.
pub trait DomNode: Clone + 'static {
    fn id(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), WireError>;
    fn has_class(&self, class: &str) -> bool;
    /// Add (`present == true`) or remove `class`.
    fn set_class(&self, class: &str, present: bool) -> Result<(), WireError>;
    /// Write a style property, including `--custom` properties.
    fn set_style_property(&self, name: &str, value: &str) -> Result<(), WireError>;
    /// Distance from the top of the document, in CSS pixels.
    fn offset_top(&self) -> f64;
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    /// Current value of a form control; empty for other elements.
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn listen(&self, kind: EventKind, handler: Handler) -> Result<Subscription, WireError>;
}

/// Key-value preference storage (`localStorage`).
pub trait PreferenceStore: 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), WireError>;
}

/// Defers work to the next display frame.
pub trait FrameScheduler: Clone + 'static {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> Result<(), WireError>;
}

/// The window and its document.
pub trait Page: Clone + 'static {
    type Node: DomNode;
    type Store: PreferenceStore;
    type Frames: FrameScheduler;

    /// The document root (`<html>`).
    fn root(&self) -> Option<Self::Node>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// Elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn create_element(&self, tag: &str) -> Result<Self::Node, WireError>;
    fn append_to_body(&self, node: &Self::Node) -> Result<(), WireError>;
    /// Local storage, if the browser grants access to it.
    fn storage(&self) -> Option<Self::Store>;
    fn frames(&self) -> Self::Frames;
    fn matches_media(&self, query: &str) -> bool;
    fn scroll_y(&self) -> f64;
    fn viewport(&self) -> Viewport;
    fn navigate(&self, url: &str) -> Result<(), WireError>;
    fn listen_window(&self, kind: EventKind, handler: Handler) -> Result<Subscription, WireError>;
    /// Whether [`Page::observe_visibility`] is backed by a real observer.
    fn supports_visibility_observer(&self) -> bool;
    fn observe_visibility(
        &self,
        targets: &[Self::Node],
        options: &VisibilityOptions,
        handler: VisibilityHandler,
    ) -> Result<Subscription, WireError>;
}
