//! Light/dark theme preference.
//!
//! The stored preference wins; without one the system
//! `prefers-color-scheme` signal decides. The theme is expressed as a single
//! class on `<html>` and persisted as `"dark"` / `"light"`.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::config::{SiteConfig, ThemeConfig};
use crate::dom::{DomEvent, DomNode, EventKind, Page, PreferenceStore, Subscription};
use crate::error::WireError;

pub const SYSTEM_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything but `"dark"` / `"light"` counts as unset.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Resolve the theme to show on load.
#[must_use]
pub fn resolve_initial(stored: Option<&str>, system_prefers_dark: bool) -> Theme {
    match stored.and_then(Theme::parse) {
        Some(theme) => theme,
        None if system_prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}

/// Reads and writes the theme on the document root.
pub struct ThemeController<N: DomNode, S: PreferenceStore> {
    root: N,
    store: Option<S>,
    storage_key: String,
    dark_class: String,
}

impl<N: DomNode, S: PreferenceStore> ThemeController<N, S> {
    pub fn new(root: N, store: Option<S>, config: &ThemeConfig) -> Self {
        Self {
            root,
            store,
            storage_key: config.storage_key.clone(),
            dark_class: config.dark_class.clone(),
        }
    }

    /// The theme currently shown.
    pub fn current(&self) -> Theme {
        if self.root.has_class(&self.dark_class) { Theme::Dark } else { Theme::Light }
    }

    pub fn stored(&self) -> Option<Theme> {
        self.store.as_ref()?.get(&self.storage_key).as_deref().and_then(Theme::parse)
    }

    pub fn apply(&self, theme: Theme) -> Result<(), WireError> {
        self.root.set_class(&self.dark_class, theme == Theme::Dark)
    }

    /// Show the stored or system theme. Never writes storage.
    pub fn apply_initial(&self, system_prefers_dark: bool) -> Result<Theme, WireError> {
        let stored = self.store.as_ref().and_then(|s| s.get(&self.storage_key));
        let theme = resolve_initial(stored.as_deref(), system_prefers_dark);
        self.apply(theme)?;
        Ok(theme)
    }

    /// Invert the shown theme and persist the result.
    pub fn toggle(&self) -> Result<Theme, WireError> {
        let next = self.current().inverted();
        self.apply(next)?;
        if let Some(store) = &self.store {
            store.set(&self.storage_key, next.as_str())?;
        }
        Ok(next)
    }
}

fn controller<P: Page>(page: &P, config: &SiteConfig) -> Option<ThemeController<P::Node, P::Store>> {
    let root = page.root()?;
    Some(ThemeController::new(root, page.storage(), &config.theme))
}

/// Apply the stored (or system) theme to `<html>`.
pub fn apply_initial_theme<P: Page>(page: &P, config: &SiteConfig) -> Result<Option<Theme>, WireError> {
    let Some(controller) = controller(page, config) else {
        return Ok(None);
    };
    controller.apply_initial(page.matches_media(SYSTEM_DARK_QUERY)).map(Some)
}

/// Flip the theme and persist it.
pub fn toggle_theme<P: Page>(page: &P, config: &SiteConfig) -> Result<Option<Theme>, WireError> {
    controller(page, config).map(|c| c.toggle()).transpose()
}

/// Wire the theme button.
pub fn mount<P: Page>(page: &P, config: &SiteConfig) -> Result<Option<Subscription>, WireError> {
    let Some(button) = page.element_by_id(&config.theme.button_id) else {
        log::debug!("theme: no #{} button", config.theme.button_id);
        return Ok(None);
    };
    let Some(controller) = controller(page, config) else {
        return Ok(None);
    };
    let sub = button.listen(
        EventKind::Click,
        Box::new(move |_: &DomEvent| match controller.toggle() {
            Ok(theme) => log::debug!("theme: now {}", theme.as_str()),
            Err(err) => log::warn!("theme: toggle failed: {err}"),
        }),
    )?;
    log::debug!("theme: button wired");
    Ok(Some(sub))
}
