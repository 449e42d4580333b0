//! Scrollspy: highlight the nav link whose section is in view.
//!
//! DESIGN
//! ======
//! The canonical strategy is a visibility observer banded to the middle of the
//! viewport (`-30%` top, `-60%` bottom). When the page has no observer, the
//! tracker falls back to polling on `scroll`: probe a quarter of the viewport
//! below the scroll offset and pick the last section whose top is at or above
//! the probe, defaulting to the first. Both paths funnel into
//! [`ScrollSpy::highlight`], so at most one link is ever active.

#[cfg(test)]
#[path = "scrollspy_test.rs"]
mod scrollspy_test;

use crate::config::SiteConfig;
use crate::dom::{DomEvent, DomNode, EventKind, Page, Subscription, VisibilityChange, VisibilityOptions};
use crate::error::WireError;

pub const ROOT_MARGIN: &str = "-30% 0px -60% 0px";
pub const THRESHOLDS: [f64; 4] = [0.0, 0.25, 0.5, 1.0];

/// Observer options for the middle-of-viewport band.
#[must_use]
pub fn band_options() -> VisibilityOptions {
    VisibilityOptions { root_margin: ROOT_MARGIN.to_owned(), thresholds: THRESHOLDS.to_vec() }
}

/// Section id referenced by a local fragment link (`#about` → `about`).
#[must_use]
pub fn fragment_target(href: &str) -> Option<&str> {
    href.trim().strip_prefix('#').filter(|id| !id.is_empty())
}

/// Index of the active section for the offset strategy.
///
/// `tops` are section offsets in document order. Returns `None` only when
/// there are no sections.
#[must_use]
pub fn select_by_offset(tops: &[f64], scroll_y: f64, viewport_height: f64) -> Option<usize> {
    if tops.is_empty() {
        return None;
    }
    let probe = scroll_y + viewport_height / 4.0;
    Some(tops.iter().rposition(|top| *top <= probe).unwrap_or(0))
}

pub struct NavLink<N: DomNode> {
    pub node: N,
    pub target_id: String,
}

pub struct ScrollSpy<N: DomNode> {
    links: Vec<NavLink<N>>,
    active_classes: Vec<String>,
}

impl<N: DomNode> ScrollSpy<N> {
    pub fn new(links: Vec<NavLink<N>>, active_classes: &[String]) -> Self {
        Self { links, active_classes: active_classes.to_vec() }
    }

    /// Section id of the highlighted link, if any.
    pub fn active(&self) -> Option<&str> {
        self.links.iter().find(|l| self.is_highlighted(&l.node)).map(|l| l.target_id.as_str())
    }

    fn is_highlighted(&self, node: &N) -> bool {
        !self.active_classes.is_empty() && self.active_classes.iter().all(|c| node.has_class(c))
    }

    /// Highlight the first link pointing at `target_id` and clear every other.
    ///
    /// Unknown ids leave the current highlight in place; returns whether a
    /// link matched.
    pub fn highlight(&self, target_id: &str) -> Result<bool, WireError> {
        let Some(chosen) = self.links.iter().position(|l| l.target_id == target_id) else {
            return Ok(false);
        };
        for (index, link) in self.links.iter().enumerate() {
            for class in &self.active_classes {
                link.node.set_class(class, index == chosen)?;
            }
        }
        Ok(true)
    }

    /// Apply one observer batch: every intersecting entry highlights its link.
    pub fn on_visibility(&self, changes: &[VisibilityChange]) -> Result<(), WireError> {
        for change in changes.iter().filter(|c| c.intersecting) {
            self.highlight(&change.target_id)?;
        }
        Ok(())
    }

    /// Offset strategy: highlight the section under the quarter-viewport probe.
    ///
    /// `sections` may arrive in link order; they are ranked by their current
    /// offset so the selection follows the document layout.
    pub fn sync_to_offset(&self, sections: &[N], scroll_y: f64, viewport_height: f64) -> Result<(), WireError> {
        let mut ranked = sections.iter().map(|s| (s.offset_top(), s)).collect::<Vec<_>>();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        let tops = ranked.iter().map(|(top, _)| *top).collect::<Vec<_>>();
        match select_by_offset(&tops, scroll_y, viewport_height).and_then(|index| ranked.get(index)) {
            Some((_, section)) => self.highlight(&section.id()).map(drop),
            None => Ok(()),
        }
    }
}

/// Collect links with a resolvable local target, plus their unique sections
/// in first-reference order.
pub fn collect_links<P: Page>(page: &P, selector: &str) -> (Vec<NavLink<P::Node>>, Vec<P::Node>) {
    let mut links = Vec::new();
    let mut sections: Vec<P::Node> = Vec::new();
    for node in page.query_all(selector) {
        let Some(target_id) = node.attribute("href").as_deref().and_then(fragment_target).map(str::to_owned) else {
            continue;
        };
        let Some(section) = page.element_by_id(&target_id) else {
            continue;
        };
        if !sections.iter().any(|s| s.id() == target_id) {
            sections.push(section);
        }
        links.push(NavLink { node, target_id });
    }
    (links, sections)
}

pub fn mount<P: Page>(page: &P, config: &SiteConfig) -> Result<Option<Subscription>, WireError> {
    let (links, sections) = collect_links(page, &config.nav.link_selector);
    if sections.is_empty() {
        log::debug!("scrollspy: no linked sections");
        return Ok(None);
    }
    let spy = ScrollSpy::new(links, &config.nav.active_classes);

    if page.supports_visibility_observer() {
        let sub = page.observe_visibility(
            &sections,
            &band_options(),
            Box::new(move |changes: &[VisibilityChange]| {
                if let Err(err) = spy.on_visibility(changes) {
                    log::warn!("scrollspy: highlight failed: {err}");
                }
            }),
        )?;
        log::debug!("scrollspy: observing {} sections", sections.len());
        return Ok(Some(sub));
    }

    spy.sync_to_offset(&sections, page.scroll_y(), page.viewport().height)?;
    let scroll_page = page.clone();
    let sub = page.listen_window(
        EventKind::Scroll,
        Box::new(move |_: &DomEvent| {
            let result = spy.sync_to_offset(&sections, scroll_page.scroll_y(), scroll_page.viewport().height);
            if let Err(err) = result {
                log::warn!("scrollspy: highlight failed: {err}");
            }
        }),
    )?;
    log::debug!("scrollspy: polling scroll offset");
    Ok(Some(sub))
}
