//! In-memory DOM used by unit tests.
//!
//! `FakePage` keeps a flat list of elements in document order and records
//! everything the features write: classes, attributes, style properties,
//! storage, navigations. Events, visibility changes and animation frames are
//! driven manually from tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::{
    DomEvent, DomNode, EventKind, FrameScheduler, Handler, Page, PreferenceStore, Subscription, Viewport,
    VisibilityChange, VisibilityHandler, VisibilityOptions,
};
use crate::error::WireError;

type SharedHandler = Rc<RefCell<Handler>>;

struct Listener {
    id: u64,
    kind: EventKind,
    handler: SharedHandler,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<Listener>,
}

impl Listeners {
    fn add(&mut self, kind: EventKind, handler: Handler) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(Listener { id, kind, handler: Rc::new(RefCell::new(handler)) });
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|l| l.id != id);
    }

    fn matching(&self, kind: EventKind) -> Vec<SharedHandler> {
        self.entries.iter().filter(|l| l.kind == kind).map(|l| Rc::clone(&l.handler)).collect()
    }
}

fn fire(handlers: Vec<SharedHandler>, event: &DomEvent) {
    for handler in handlers {
        (*handler.borrow_mut())(event);
    }
}

// =============================================================
// Nodes
// =============================================================

#[derive(Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    style_writes: BTreeMap<String, usize>,
    offset_top: f64,
    text: String,
    value: String,
    listeners: Listeners,
}

/// A fake element. Clones share state, like JS references.
#[derive(Clone)]
pub struct FakeNode(Rc<RefCell<NodeData>>);

impl FakeNode {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData { tag: tag.to_owned(), ..NodeData::default() })))
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.0.borrow_mut().attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.0.borrow_mut().classes.push(class.to_owned());
        self
    }

    pub fn with_offset_top(self, top: f64) -> Self {
        self.0.borrow_mut().offset_top = top;
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.to_owned();
        self
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn style(&self, name: &str) -> Option<String> {
        self.0.borrow().styles.get(name).cloned()
    }

    /// How many times `name` has been written.
    pub fn style_writes(&self, name: &str) -> usize {
        self.0.borrow().style_writes.get(name).copied().unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.entries.len()
    }

    /// Dispatch `kind` at this node and return the event for inspection.
    pub fn dispatch(&self, kind: EventKind) -> DomEvent {
        let event = DomEvent::new(kind);
        self.dispatch_event(&event);
        event
    }

    pub fn dispatch_event(&self, event: &DomEvent) {
        let handlers = self.0.borrow().listeners.matching(event.kind);
        fire(handlers, event);
    }

    fn matches(&self, selector: &str) -> bool {
        let data = self.0.borrow();
        let (tag, attr) = match selector.split_once('[') {
            Some((tag, rest)) => (tag, Some(rest.trim_end_matches(']'))),
            None => (selector, None),
        };
        (tag.is_empty() || data.tag == tag) && attr.is_none_or(|name| data.attributes.contains_key(name))
    }
}

impl DomNode for FakeNode {
    fn id(&self) -> String {
        self.attribute("id").unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), WireError> {
        self.0.borrow_mut().attributes.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn set_class(&self, class: &str, present: bool) -> Result<(), WireError> {
        let mut data = self.0.borrow_mut();
        let has = data.classes.iter().any(|c| c == class);
        if present && !has {
            data.classes.push(class.to_owned());
        } else if !present {
            data.classes.retain(|c| c != class);
        }
        Ok(())
    }

    fn set_style_property(&self, name: &str, value: &str) -> Result<(), WireError> {
        let mut data = self.0.borrow_mut();
        data.styles.insert(name.to_owned(), value.to_owned());
        *data.style_writes.entry(name.to_owned()).or_default() += 1;
        Ok(())
    }

    fn offset_top(&self) -> f64 {
        self.0.borrow().offset_top
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_owned();
    }

    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_owned();
    }

    fn listen(&self, kind: EventKind, handler: Handler) -> Result<Subscription, WireError> {
        let id = self.0.borrow_mut().listeners.add(kind, handler);
        let node = self.clone();
        Ok(Subscription::new(move || node.0.borrow_mut().listeners.remove(id)))
    }
}

// =============================================================
// Storage and frames
// =============================================================

#[derive(Clone, Default)]
pub struct MemoryStore(Rc<RefCell<BTreeMap<String, String>>>);

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WireError> {
        self.0.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Frame scheduler that only runs callbacks when a test calls [`ManualFrames::run_frame`].
#[derive(Clone, Default)]
pub struct ManualFrames(Rc<RefCell<Vec<Box<dyn FnOnce()>>>>);

impl ManualFrames {
    pub fn pending(&self) -> usize {
        self.0.borrow().len()
    }

    /// Run every callback queued before this call; returns how many ran.
    pub fn run_frame(&self) -> usize {
        let queued = std::mem::take(&mut *self.0.borrow_mut());
        let count = queued.len();
        for callback in queued {
            callback();
        }
        count
    }
}

impl FrameScheduler for ManualFrames {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> Result<(), WireError> {
        self.0.borrow_mut().push(callback);
        Ok(())
    }
}

// =============================================================
// Page
// =============================================================

struct Observer {
    id: u64,
    targets: Vec<String>,
    options: VisibilityOptions,
    handler: Rc<RefCell<VisibilityHandler>>,
}

struct PageData {
    root: FakeNode,
    nodes: Vec<FakeNode>,
    body: Vec<FakeNode>,
    store: MemoryStore,
    storage_available: bool,
    frames: ManualFrames,
    media: BTreeSet<String>,
    scroll_y: f64,
    viewport: Viewport,
    navigations: Vec<String>,
    window_listeners: Listeners,
    observer_supported: bool,
    next_observer_id: u64,
    observers: Vec<Observer>,
}

#[derive(Clone)]
pub struct FakePage(Rc<RefCell<PageData>>);

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(PageData {
            root: FakeNode::new("html"),
            nodes: Vec::new(),
            body: Vec::new(),
            store: MemoryStore::default(),
            storage_available: true,
            frames: ManualFrames::default(),
            media: BTreeSet::new(),
            scroll_y: 0.0,
            viewport: Viewport { width: 1000.0, height: 800.0 },
            navigations: Vec::new(),
            window_listeners: Listeners::default(),
            observer_supported: true,
            next_observer_id: 0,
            observers: Vec::new(),
        })))
    }

    /// Append `node` to the document and hand it back.
    pub fn add(&self, node: FakeNode) -> FakeNode {
        self.0.borrow_mut().nodes.push(node.clone());
        node
    }

    pub fn root_node(&self) -> FakeNode {
        self.0.borrow().root.clone()
    }

    pub fn body_children(&self) -> Vec<FakeNode> {
        self.0.borrow().body.clone()
    }

    pub fn store(&self) -> MemoryStore {
        self.0.borrow().store.clone()
    }

    pub fn set_storage_available(&self, available: bool) {
        self.0.borrow_mut().storage_available = available;
    }

    pub fn manual_frames(&self) -> ManualFrames {
        self.0.borrow().frames.clone()
    }

    pub fn set_media(&self, query: &str, matches: bool) {
        let mut data = self.0.borrow_mut();
        if matches {
            data.media.insert(query.to_owned());
        } else {
            data.media.remove(query);
        }
    }

    pub fn set_scroll_y(&self, y: f64) {
        self.0.borrow_mut().scroll_y = y;
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.0.borrow_mut().viewport = Viewport { width, height };
    }

    pub fn set_observer_supported(&self, supported: bool) {
        self.0.borrow_mut().observer_supported = supported;
    }

    pub fn navigations(&self) -> Vec<String> {
        self.0.borrow().navigations.clone()
    }

    pub fn window_listener_count(&self) -> usize {
        self.0.borrow().window_listeners.entries.len()
    }

    pub fn observer_count(&self) -> usize {
        self.0.borrow().observers.len()
    }

    pub fn observer_options(&self) -> Vec<VisibilityOptions> {
        self.0.borrow().observers.iter().map(|o| o.options.clone()).collect()
    }

    pub fn dispatch_window(&self, event: &DomEvent) {
        let handlers = self.0.borrow().window_listeners.matching(event.kind);
        fire(handlers, event);
    }

    /// Deliver one visibility change to every observer watching `target_id`.
    pub fn intersect(&self, target_id: &str, intersecting: bool) {
        let handlers = self
            .0
            .borrow()
            .observers
            .iter()
            .filter(|o| o.targets.iter().any(|t| t == target_id))
            .map(|o| Rc::clone(&o.handler))
            .collect::<Vec<_>>();
        let changes = [VisibilityChange { target_id: target_id.to_owned(), intersecting }];
        for handler in handlers {
            (*handler.borrow_mut())(&changes);
        }
    }
}

impl Page for FakePage {
    type Node = FakeNode;
    type Store = MemoryStore;
    type Frames = ManualFrames;

    fn root(&self) -> Option<FakeNode> {
        Some(self.root_node())
    }

    fn element_by_id(&self, id: &str) -> Option<FakeNode> {
        let data = self.0.borrow();
        data.nodes.iter().chain(data.body.iter()).find(|n| n.id() == id).cloned()
    }

    fn query_all(&self, selector: &str) -> Vec<FakeNode> {
        let data = self.0.borrow();
        data.nodes.iter().chain(data.body.iter()).filter(|n| n.matches(selector)).cloned().collect()
    }

    fn create_element(&self, tag: &str) -> Result<FakeNode, WireError> {
        Ok(FakeNode::new(tag))
    }

    fn append_to_body(&self, node: &FakeNode) -> Result<(), WireError> {
        self.0.borrow_mut().body.push(node.clone());
        Ok(())
    }

    fn storage(&self) -> Option<MemoryStore> {
        let data = self.0.borrow();
        data.storage_available.then(|| data.store.clone())
    }

    fn frames(&self) -> ManualFrames {
        self.manual_frames()
    }

    fn matches_media(&self, query: &str) -> bool {
        self.0.borrow().media.contains(query)
    }

    fn scroll_y(&self) -> f64 {
        self.0.borrow().scroll_y
    }

    fn viewport(&self) -> Viewport {
        self.0.borrow().viewport
    }

    fn navigate(&self, url: &str) -> Result<(), WireError> {
        self.0.borrow_mut().navigations.push(url.to_owned());
        Ok(())
    }

    fn listen_window(&self, kind: EventKind, handler: Handler) -> Result<Subscription, WireError> {
        let id = self.0.borrow_mut().window_listeners.add(kind, handler);
        let page = self.clone();
        Ok(Subscription::new(move || page.0.borrow_mut().window_listeners.remove(id)))
    }

    fn supports_visibility_observer(&self) -> bool {
        self.0.borrow().observer_supported
    }

    fn observe_visibility(
        &self,
        targets: &[FakeNode],
        options: &VisibilityOptions,
        handler: VisibilityHandler,
    ) -> Result<Subscription, WireError> {
        let mut data = self.0.borrow_mut();
        data.next_observer_id += 1;
        let id = data.next_observer_id;
        data.observers.push(Observer {
            id,
            targets: targets.iter().map(|t| t.id()).collect(),
            options: options.clone(),
            handler: Rc::new(RefCell::new(handler)),
        });
        let page = self.clone();
        Ok(Subscription::new(move || page.0.borrow_mut().observers.retain(|o| o.id != id)))
    }
}
