//! Page behaviours, one module per feature.
//!
//! Each `mount` looks up its elements, wires listeners, and returns
//! `Ok(None)` when the page variant omits the feature.

pub mod bleed;
pub mod contact;
pub mod glow;
pub mod mobile_nav;
pub mod scrollspy;
pub mod theme;
