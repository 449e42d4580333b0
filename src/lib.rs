//! # portfolio-web
//!
//! WebAssembly front end for a single-page portfolio site. Every behaviour is
//! a small, independent piece of DOM wiring mounted once the document is
//! ready:
//!
//! | Module | Role |
//! |--------|------|
//! | [`features::theme`] | Persisted light/dark preference on the document root |
//! | [`features::mobile_nav`] | Disclosure button for the mobile menu |
//! | [`features::scrollspy`] | Highlights the nav link of the section in view |
//! | [`features::bleed`] | Section background tokens and bleed heights |
//! | [`features::glow`] | Pointer-following glow, coalesced to one write per frame |
//! | [`features::contact`] | Contact form validation and `mailto:` hand-off |
//!
//! The features never touch `web_sys` directly. They are generic over the
//! [`dom::Page`] and [`dom::DomNode`] seams; the `hydrate` feature supplies the
//! browser implementation while tests drive an in-memory fixture.

pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod features;

pub use app::App;
pub use config::SiteConfig;
pub use error::WireError;

#[cfg(feature = "hydrate")]
use wasm_bindgen::prelude::wasm_bindgen;

/// WASM entry point: install logging, apply the stored theme, and mount the
/// page behaviours once the DOM is parsed.
#[cfg(feature = "hydrate")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("logger already installed: {err}").into());
    }

    match dom::web::WebPage::current() {
        Ok(page) => app::boot(page),
        Err(err) => log::warn!("portfolio init skipped: {err}"),
    }
}

/// Debug hook mirroring the theme button, callable from the browser console.
#[cfg(feature = "hydrate")]
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() {
    let result = dom::web::WebPage::current().and_then(|page| {
        let config = SiteConfig::from_page(&page);
        features::theme::toggle_theme(&page, &config)
    });
    match result {
        Ok(Some(theme)) => log::info!("theme toggled to {}", theme.as_str()),
        Ok(None) => log::debug!("theme toggle skipped: no document root"),
        Err(err) => log::warn!("theme toggle failed: {err}"),
    }
}
