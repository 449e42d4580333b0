//! Site configuration: element ids, class names, and the contact recipient.
//!
//! Defaults match the portfolio markup. A page may override any subset by
//! embedding JSON in `<script type="application/json" id="portfolio-config">`;
//! missing fields keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::dom::{DomNode, Page};
use crate::error::WireError;

/// Id of the optional inline JSON config element.
pub const INLINE_CONFIG_ID: &str = "portfolio-config";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub theme: ThemeConfig,
    pub nav: NavConfig,
    pub sections: SectionConfig,
    pub glow: GlowConfig,
    pub contact: ContactConfig,
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json(raw: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read the inline config element, falling back to defaults when it is
    /// absent or malformed.
    pub fn from_page<P: Page>(page: &P) -> Self {
        let Some(node) = page.element_by_id(INLINE_CONFIG_ID) else {
            return Self::default();
        };
        match Self::from_json(&node.text()) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring inline config: {err}");
                Self::default()
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    /// `localStorage` key holding `"dark"` or `"light"`.
    pub storage_key: String,
    /// Class toggled on `<html>`.
    pub dark_class: String,
    pub button_id: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_owned(),
            dark_class: "dark".to_owned(),
            button_id: "theme-toggle".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavConfig {
    pub menu_button_id: String,
    pub menu_panel_id: String,
    /// Class present on the panel while the menu is collapsed.
    pub hidden_class: String,
    /// Selector for scrollspy links; each carries an `href="#section"`.
    pub link_selector: String,
    /// Classes marking the active link.
    pub active_classes: Vec<String>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            menu_button_id: "mobile-menu-btn".to_owned(),
            menu_panel_id: "mobile-menu".to_owned(),
            hidden_class: "hidden".to_owned(),
            link_selector: "a[data-scroll]".to_owned(),
            active_classes: vec!["text-indigo-600".to_owned(), "dark:text-indigo-400".to_owned()],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SectionConfig {
    pub selector: String,
    pub bleed_class: String,
    pub bleed_bottom_class: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            selector: "section[data-section-bg]".to_owned(),
            bleed_class: "section-bleed".to_owned(),
            bleed_bottom_class: "section-bleed-bottom".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlowConfig {
    pub class: String,
    pub visible_class: String,
    /// Resting position as fractions of the viewport width and height.
    pub home_x: f64,
    pub home_y: f64,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            class: "pointer-glow".to_owned(),
            visible_class: "is-visible".to_owned(),
            home_x: 0.5,
            home_y: 0.32,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactConfig {
    pub form_id: String,
    pub name_field_id: String,
    pub email_field_id: String,
    pub message_field_id: String,
    pub status_id: String,
    pub recipient: String,
    pub field_error_class: String,
    pub status_error_class: String,
    pub status_success_class: String,
    pub error_message: String,
    pub success_message: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form_id: "contact-form".to_owned(),
            name_field_id: "name".to_owned(),
            email_field_id: "email".to_owned(),
            message_field_id: "message".to_owned(),
            status_id: "form-status".to_owned(),
            recipient: "dchangez@uoguelph.ca".to_owned(),
            field_error_class: "field-error".to_owned(),
            status_error_class: "status-error".to_owned(),
            status_success_class: "status-success".to_owned(),
            error_message: "Please fill in your name, a valid email, and a message.".to_owned(),
            success_message: "Thanks! Your mail client should open shortly.".to_owned(),
        }
    }
}
