//! Motion parameters for the page effects.
//!
//! Delays, thresholds and effect strengths are decided here and handed to the
//! renderer, which writes them into data attributes and CSS variables. The static
//! script reads those values back; it never carries numbers of its own.

use std::time::Duration;

use serde::Serialize;

/// Header switches to its solid style past this scroll offset.
pub const HEADER_SCROLL_THRESHOLD_PX: f64 = 50.0;
/// Height of the fixed header, subtracted when scrolling to a section.
pub const HEADER_OFFSET_PX: f64 = 80.0;
/// How long the cursor stays in its pressed state.
pub const CURSOR_CLICK_MS: u64 = 150;
/// How long the loading screen stays up after the page starts.
pub const LOADING_DURATION_MS: u64 = 2500;
/// Footer slide-in distance in px, consumed as the footer scrolls fully into view.
pub const FOOTER_PARALLAX_PX: f64 = 100.0;

/// Divisor applied to the pointer's distance from a button's centre.
/// Larger values pull less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnetic {
    /// Solid buttons.
    Button,
    /// Text links.
    Text,
}

impl Magnetic {
    pub fn divisor(&self) -> u32 {
        match self {
            Magnetic::Button => 10,
            Magnetic::Text => 5,
        }
    }
}

/// Page regions that reveal on entry, with the visible fraction that triggers each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Hero,
    Projects,
    About,
    Stack,
    Contact,
    ProjectsPage,
}

impl Section {
    pub fn id(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::Projects => "projects",
            Section::About => "about",
            Section::Stack => "stack",
            Section::Contact => "contact",
            Section::ProjectsPage => "all-projects",
        }
    }

    pub fn reveal_threshold(&self) -> f64 {
        match self {
            Section::Hero => 0.2,
            Section::ProjectsPage => 0.05,
            _ => 0.1,
        }
    }
}

/// User preference for motion; reduced motion drops delays and pauses orbits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

impl MotionPreference {
    /// Apply the preference to a computed delay.
    pub fn delay(&self, delay: Duration) -> Duration {
        match self {
            MotionPreference::Full => delay,
            MotionPreference::Reduced => Duration::ZERO,
        }
    }

    pub fn animate_orbits(&self) -> bool {
        matches!(self, MotionPreference::Full)
    }

    /// Value of the `data-motion` attribute on `<body>`; the script skips pointer
    /// and scroll effects when it reads `reduced`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionPreference::Full => "full",
            MotionPreference::Reduced => "reduced",
        }
    }
}

/// `base + step × index`, the entry delay of the `index`-th element of a staggered group.
pub fn stagger_delay(index: usize, base_ms: u64, step_ms: u64) -> Duration {
    Duration::from_millis(base_ms.saturating_add(step_ms.saturating_mul(index as u64)))
}

/// Stagger presets used by the renderer.
pub mod stagger {
    use super::stagger_delay;
    use std::time::Duration;

    pub fn project_card(index: usize) -> Duration {
        stagger_delay(index, 200, 150)
    }

    pub fn skill_item(index: usize) -> Duration {
        stagger_delay(index, 300, 50)
    }

    pub fn title_letter(index: usize) -> Duration {
        stagger_delay(index, 0, 30)
    }

    pub fn project_tile(index: usize) -> Duration {
        stagger_delay(index, 0, 100)
    }
}

/// A character of a split heading and the delay before it rises in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Letter {
    pub ch: char,
    pub delay: Duration,
}

/// Split a heading into per-character entries. Whitespace keeps its slot in the sequence.
pub fn split_letters(text: &str, preference: MotionPreference) -> Vec<Letter> {
    text.chars()
        .enumerate()
        .map(|(i, ch)| Letter {
            ch,
            delay: preference.delay(stagger::title_letter(i)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_thresholds_per_section() {
        assert_eq!(Section::Hero.reveal_threshold(), 0.2);
        assert_eq!(Section::About.reveal_threshold(), 0.1);
        assert_eq!(Section::ProjectsPage.reveal_threshold(), 0.05);
        assert_eq!(Section::ProjectsPage.id(), "all-projects");
    }

    #[test]
    fn stagger_presets() {
        assert_eq!(stagger::project_card(0), Duration::from_millis(200));
        assert_eq!(stagger::project_card(3), Duration::from_millis(650));
        assert_eq!(stagger::skill_item(4), Duration::from_millis(500));
        assert_eq!(MotionPreference::Reduced.delay(stagger::project_card(5)), Duration::ZERO);
    }

    #[test]
    fn letters_keep_spaces_and_delays() {
        let letters = split_letters("Hi there", MotionPreference::Full);
        assert_eq!(letters.len(), 8);
        assert_eq!(letters[2].ch, ' ');
        assert_eq!(letters[7].delay, Duration::from_millis(210));
        assert!(split_letters("Hi", MotionPreference::Reduced)
            .iter()
            .all(|l| l.delay.is_zero()));
    }

    #[test]
    fn text_links_pull_harder_than_buttons() {
        assert!(Magnetic::Text.divisor() < Magnetic::Button.divisor());
        assert_eq!(MotionPreference::Reduced.as_str(), "reduced");
        assert!(!MotionPreference::Reduced.animate_orbits());
    }
}
