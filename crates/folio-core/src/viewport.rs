//! Viewport buckets — the three screen classes the layout and renderer key on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discrete screen-size class. Layouts are computed once per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSize {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl ScreenSize {
    pub const ALL: [ScreenSize; 3] = [ScreenSize::Mobile, ScreenSize::Tablet, ScreenSize::Desktop];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenSize::Mobile => "mobile",
            ScreenSize::Tablet => "tablet",
            ScreenSize::Desktop => "desktop",
        }
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown screen size: {0} (expected mobile, tablet or desktop)")]
pub struct ParseScreenError(pub String);

impl FromStr for ScreenSize {
    type Err = ParseScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(ScreenSize::Mobile),
            "tablet" => Ok(ScreenSize::Tablet),
            "desktop" => Ok(ScreenSize::Desktop),
            _ => Err(ParseScreenError(s.to_string())),
        }
    }
}

/// Width thresholds in CSS pixels.
///
/// | Width | Bucket |
/// |-------|--------|
/// | `< mobile` | Mobile |
/// | `< tablet` | Tablet |
/// | otherwise | Desktop |
///
/// `desktop` is kept for wide-layout tweaks in the stylesheet; classification stops at `tablet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 768,
            tablet: 1024,
            desktop: 1280,
        }
    }
}

/// Quiet period after the last resize before the browser re-classifies the width.
pub const RESIZE_DEBOUNCE_MS: u64 = 100;

impl Breakpoints {
    pub fn classify(&self, width_px: u32) -> ScreenSize {
        if width_px < self.mobile {
            ScreenSize::Mobile
        } else if width_px < self.tablet {
            ScreenSize::Tablet
        } else {
            ScreenSize::Desktop
        }
    }

    /// Bucket for a `Sec-CH-Viewport-Width` style hint (CSS pixels, possibly fractional).
    /// Garbage, negative or non-finite values give `None`.
    pub fn classify_hint(&self, hint: &str) -> Option<ScreenSize> {
        let width: f64 = hint.trim().parse().ok()?;
        if !width.is_finite() || width < 0.0 {
            return None;
        }
        Some(self.classify(width.min(u32::MAX as f64) as u32))
    }
}
