//! Mobile menu disclosure button.
//!
//! `aria-expanded` on the button is the source of truth; the panel's hidden
//! class is derived from it on every toggle so the two cannot drift apart.

#[cfg(test)]
#[path = "mobile_nav_test.rs"]
mod mobile_nav_test;

use crate::config::SiteConfig;
use crate::dom::{DomEvent, DomNode, EventKind, Page, Subscription};
use crate::error::WireError;

const ARIA_EXPANDED: &str = "aria-expanded";

pub struct MobileNav<N: DomNode> {
    button: N,
    panel: N,
    hidden_class: String,
}

impl<N: DomNode> MobileNav<N> {
    pub fn new(button: N, panel: N, hidden_class: &str) -> Self {
        Self { button, panel, hidden_class: hidden_class.to_owned() }
    }

    pub fn is_expanded(&self) -> bool {
        self.button.attribute(ARIA_EXPANDED).as_deref() == Some("true")
    }

    /// Flip the menu; returns the new expanded state.
    pub fn toggle(&self) -> Result<bool, WireError> {
        let expanded = !self.is_expanded();
        self.button.set_attribute(ARIA_EXPANDED, if expanded { "true" } else { "false" })?;
        self.panel.set_class(&self.hidden_class, !expanded)?;
        Ok(expanded)
    }
}

pub fn mount<P: Page>(page: &P, config: &SiteConfig) -> Result<Option<Subscription>, WireError> {
    let (Some(button), Some(panel)) =
        (page.element_by_id(&config.nav.menu_button_id), page.element_by_id(&config.nav.menu_panel_id))
    else {
        log::debug!("mobile nav: button or panel missing");
        return Ok(None);
    };
    let nav = MobileNav::new(button.clone(), panel, &config.nav.hidden_class);
    let sub = button.listen(
        EventKind::Click,
        Box::new(move |_: &DomEvent| {
            if let Err(err) = nav.toggle() {
                log::warn!("mobile nav: toggle failed: {err}");
            }
        }),
    )?;
    log::debug!("mobile nav: button wired");
    Ok(Some(sub))
}
