//! Section background tokens and bleed heights.
//!
//! Each `section[data-section-bg]` gets `--section-bg` from its token and
//! `--section-bleed-height` from its `data-bleed` preset, plus the
//! `section-bleed` class unless it already carries a bleed variant.

#[cfg(test)]
#[path = "bleed_test.rs"]
mod bleed_test;

use crate::config::{SectionConfig, SiteConfig};
use crate::dom::{DomNode, Page};
use crate::error::WireError;

pub const BG_ATTR: &str = "data-section-bg";
pub const BLEED_ATTR: &str = "data-bleed";
pub const BG_PROPERTY: &str = "--section-bg";
pub const BLEED_HEIGHT_PROPERTY: &str = "--section-bleed-height";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BleedPreset {
    Subtle,
    #[default]
    Medium,
    Strong,
}

impl BleedPreset {
    /// Resolve a `data-bleed` token; missing or unknown tokens are `Medium`.
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some("subtle") => Self::Subtle,
            Some("strong") => Self::Strong,
            _ => Self::Medium,
        }
    }

    #[must_use]
    pub fn height(self) -> &'static str {
        match self {
            Self::Subtle => "36px",
            Self::Medium => "60px",
            Self::Strong => "96px",
        }
    }
}

/// Attributes read from one section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Background token as written; `None` only when the attribute is absent.
    pub background: Option<String>,
    pub bleed: BleedPreset,
}

impl SectionDescriptor {
    pub fn read<N: DomNode>(section: &N) -> Self {
        let background = section.attribute(BG_ATTR);
        let bleed = BleedPreset::from_token(section.attribute(BLEED_ATTR).as_deref());
        Self { background, bleed }
    }
}

/// Style one section.
pub fn style_section<N: DomNode>(section: &N, config: &SectionConfig) -> Result<SectionDescriptor, WireError> {
    let descriptor = SectionDescriptor::read(section);
    if let Some(background) = &descriptor.background {
        section.set_style_property(BG_PROPERTY, background)?;
        section.set_style_property(BLEED_HEIGHT_PROPERTY, descriptor.bleed.height())?;
    }
    if !section.has_class(&config.bleed_class) && !section.has_class(&config.bleed_bottom_class) {
        section.set_class(&config.bleed_class, true)?;
    }
    Ok(descriptor)
}

/// Style every configured section; returns how many were styled.
pub fn mount<P: Page>(page: &P, config: &SiteConfig) -> usize {
    let mut styled = 0;
    for section in page.query_all(&config.sections.selector) {
        match style_section(&section, &config.sections) {
            Ok(_) => styled += 1,
            Err(err) => log::warn!("bleed: section #{} skipped: {err}", section.id()),
        }
    }
    log::debug!("bleed: styled {styled} sections");
    styled
}
