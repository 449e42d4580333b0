//! Pointer-following glow.
//!
//! Pointer events only move the target; the style write happens on the next
//! animation frame. A [`FrameCoalescer`] keeps at most one frame in flight, so
//! any number of moves between two frames cost a single render. The effect is
//! not created at all under `prefers-reduced-motion: reduce`.

#[cfg(test)]
#[path = "glow_test.rs"]
mod glow_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{GlowConfig, SiteConfig};
use crate::dom::{DomEvent, DomNode, EventKind, FrameScheduler, Page, Subscription, Viewport};
use crate::error::WireError;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const X_PROPERTY: &str = "--glow-x";
pub const Y_PROPERTY: &str = "--glow-y";

/// Pending-frame guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCoalescer {
    pending: bool,
}

impl FrameCoalescer {
    /// Mark an update as wanted. Returns `true` when the caller must schedule
    /// a frame, `false` when one is already pending.
    pub fn request_update(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Clear the pending flag; returns whether an update was due.
    pub fn flush(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Where the glow should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowTarget {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

impl GlowTarget {
    /// Resting, hidden position for `viewport`.
    #[must_use]
    pub fn home(viewport: Viewport, config: &GlowConfig) -> Self {
        Self { x: viewport.width * config.home_x, y: viewport.height * config.home_y, visible: false }
    }
}

struct GlowInner<N: DomNode> {
    node: N,
    config: GlowConfig,
    target: GlowTarget,
    frame: FrameCoalescer,
}

impl<N: DomNode> GlowInner<N> {
    fn render(&self) -> Result<(), WireError> {
        let GlowTarget { x, y, visible } = self.target;
        self.node.set_style_property(X_PROPERTY, &format!("{x:.1}px"))?;
        self.node.set_style_property(Y_PROPERTY, &format!("{y:.1}px"))?;
        self.node.set_class(&self.config.visible_class, visible)
    }

    fn flush(&mut self) {
        if self.frame.flush() {
            if let Err(err) = self.render() {
                log::warn!("glow: render failed: {err}");
            }
        }
    }
}

/// The glow element plus its frame-coalesced renderer.
pub struct PointerGlow<N: DomNode, F: FrameScheduler> {
    inner: Rc<RefCell<GlowInner<N>>>,
    frames: F,
}

impl<N: DomNode, F: FrameScheduler> Clone for PointerGlow<N, F> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner), frames: self.frames.clone() }
    }
}

impl<N: DomNode, F: FrameScheduler> PointerGlow<N, F> {
    pub fn new(node: N, frames: F, viewport: Viewport, config: &GlowConfig) -> Self {
        let inner = GlowInner {
            node,
            config: config.clone(),
            target: GlowTarget::home(viewport, config),
            frame: FrameCoalescer::default(),
        };
        Self { inner: Rc::new(RefCell::new(inner)), frames }
    }

    pub fn target(&self) -> GlowTarget {
        self.inner.borrow().target
    }

    pub fn pointer_moved(&self, x: f64, y: f64) {
        self.inner.borrow_mut().target = GlowTarget { x, y, visible: true };
        self.request_update();
    }

    pub fn pointer_left(&self, viewport: Viewport) {
        {
            let mut inner = self.inner.borrow_mut();
            let home = GlowTarget::home(viewport, &inner.config);
            inner.target = home;
        }
        self.request_update();
    }

    /// Schedule a render for the next frame unless one is already pending.
    pub fn request_update(&self) {
        if !self.inner.borrow_mut().frame.request_update() {
            return;
        }
        let inner = Rc::clone(&self.inner);
        if let Err(err) = self.frames.schedule(Box::new(move || inner.borrow_mut().flush())) {
            log::warn!("glow: frame request failed, rendering now: {err}");
            self.flush();
        }
    }

    /// Run a pending render immediately.
    pub fn flush(&self) {
        self.inner.borrow_mut().flush();
    }
}

pub fn mount<P: Page>(page: &P, config: &SiteConfig) -> Result<Option<Subscription>, WireError> {
    if page.matches_media(REDUCED_MOTION_QUERY) {
        log::debug!("glow: reduced motion requested");
        return Ok(None);
    }
    let Some(root) = page.root() else {
        log::debug!("glow: no document root");
        return Ok(None);
    };
    let node = page.create_element("div")?;
    node.set_class(&config.glow.class, true)?;
    node.set_attribute("aria-hidden", "true")?;
    page.append_to_body(&node)?;

    let glow = PointerGlow::new(node, page.frames(), page.viewport(), &config.glow);
    glow.request_update();

    let on_move = glow.clone();
    let moves = page.listen_window(
        EventKind::PointerMove,
        Box::new(move |event: &DomEvent| on_move.pointer_moved(event.client_x, event.client_y)),
    )?;
    let leave_page = page.clone();
    let leaves = root.listen(
        EventKind::PointerLeave,
        Box::new(move |_: &DomEvent| glow.pointer_left(leave_page.viewport())),
    )?;
    log::debug!("glow: tracking pointer");
    Ok(Some(Subscription::all(vec![moves, leaves])))
}
