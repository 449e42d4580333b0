//! Application state: every mounted feature's listeners.
//!
//! An `App` is created once the DOM is ready and discarded on page unload.
//! Features are mounted independently; one failing or absent never stops the
//! others.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use crate::config::SiteConfig;
use crate::dom::{Page, Subscription};
use crate::error::WireError;
use crate::features::{bleed, contact, glow, mobile_nav, scrollspy, theme};

#[derive(Debug, Default)]
pub struct App {
    subscriptions: Vec<(&'static str, Subscription)>,
    styled_sections: usize,
}

impl App {
    /// Mount every feature against `page`.
    pub fn mount<P: Page>(page: &P, config: &SiteConfig) -> Self {
        let mut app = Self::default();
        app.keep("theme", theme::mount(page, config));
        app.keep("mobile_nav", mobile_nav::mount(page, config));
        app.keep("scrollspy", scrollspy::mount(page, config));
        app.keep("glow", glow::mount(page, config));
        app.keep("contact", contact::mount(page, config));
        app.styled_sections = bleed::mount(page, config);
        log::info!("portfolio mounted: {:?}", app.features());
        app
    }

    fn keep(&mut self, feature: &'static str, mounted: Result<Option<Subscription>, WireError>) {
        match mounted {
            Ok(Some(sub)) => self.subscriptions.push((feature, sub)),
            Ok(None) => log::debug!("{feature}: not present on this page"),
            Err(err) => log::warn!("{feature}: mount failed: {err}"),
        }
    }

    /// Names of the features holding live listeners.
    pub fn features(&self) -> Vec<&'static str> {
        self.subscriptions.iter().map(|(name, _)| *name).collect()
    }

    pub fn styled_sections(&self) -> usize {
        self.styled_sections
    }

    /// Remove every listener and observer.
    pub fn teardown(self) {
        for (_, sub) in self.subscriptions {
            sub.unsubscribe();
        }
    }
}

/// Apply the stored theme now and mount the `App` once the DOM is parsed;
/// drop it again on `pagehide`.
#[cfg(feature = "hydrate")]
pub fn boot(page: crate::dom::web::WebPage) {
    use std::cell::RefCell;
    use std::rc::Rc;

    let config = SiteConfig::from_page(&page);
    if let Err(err) = theme::apply_initial_theme(&page, &config) {
        log::warn!("theme: initial apply failed: {err}");
    }

    let app: Rc<RefCell<Option<App>>> = Rc::default();
    let mounted = Rc::clone(&app);
    let ready_page = page.clone();
    let ready = page.on_ready(Box::new(move || {
        *mounted.borrow_mut() = Some(App::mount(&ready_page, &config));
    }));
    if let Err(err) = ready {
        log::warn!("portfolio: could not wait for DOM ready: {err}");
        return;
    }
    let unload = page.on_unload(Box::new(move || {
        if let Some(app) = app.borrow_mut().take() {
            app.teardown();
        }
    }));
    if let Err(err) = unload {
        log::warn!("portfolio: could not watch for unload: {err}");
    }
}
