//! Folio — core library.
//! Portfolio content, the tech-stack orbital layout, motion state, page rendering
//! and the contact webhook dispatcher.

pub mod config;
pub mod contact;
pub mod content;
pub mod motion;
pub mod orbital;
pub mod pages;
pub mod viewport;

pub use config::{SiteConfig, WebhookConfig};
pub use contact::{ContactDispatcher, ContactError, ContactMessage};
pub use content::{ContentError, Portfolio, Project};
pub use motion::MotionPreference;
pub use orbital::{compute_layout, compute_layout_checked, OrbitalLayout, TechItem};
pub use pages::{ContactFormView, RenderOptions};
pub use viewport::{Breakpoints, ScreenSize};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
