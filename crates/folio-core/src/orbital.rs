//! Orbital layout for the tech-stack showcase.
//!
//! Items are sorted by mass, split into concentric rings, and each ring gets a
//! radius, a rotation period and a direction. The period loosely follows
//! Kepler's third law and is then clamped so every ring stays readable on screen.
//! The whole computation is pure; callers recompute when the viewport bucket changes.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::viewport::ScreenSize;

/// Shortest allowed revolution, in seconds.
pub const MIN_PERIOD_SECS: f64 = 8.0;
/// Longest allowed revolution, in seconds.
pub const MAX_PERIOD_SECS: f64 = 35.0;
/// Bound for the optional per-item angular jitter, in degrees.
pub const JITTER_DEG: f64 = 6.0;

/// Rendered size of one orbiting icon, in px.
pub const ITEM_SIZE_PX: f64 = 40.0;

/// Made-up gravitational constant, tuned so a desktop inner ring lands near 20s.
const GRAVITY: f64 = 8.0e4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechCategory {
    Frontend,
    Backend,
    Devops,
    Data,
    Tooling,
    Ai,
}

/// One technology shown in the stack widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechItem {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: TechCategory,
    /// 1–5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<f32>,
    /// Heavier items sink to inner rings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
}

impl TechItem {
    /// Effective mass. Missing, non-finite or non-positive values count as 1.0.
    pub fn weight(&self) -> f64 {
        self.mass
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Value for the CSS `animation-direction` property.
    pub fn css(&self) -> &'static str {
        match self {
            Direction::Clockwise => "normal",
            Direction::CounterClockwise => "reverse",
        }
    }
}

/// An item with its resting angle on the ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedItem {
    pub item: TechItem,
    /// Degrees in `[0, 360)`.
    pub angle_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Orbit {
    pub radius: f64,
    pub period_secs: f64,
    pub direction: Direction,
    pub phase_deg: f64,
    pub items: Vec<PlacedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalLayout {
    pub screen: ScreenSize,
    pub orbits: Vec<Orbit>,
}

impl OrbitalLayout {
    pub fn empty(screen: ScreenSize) -> Self {
        Self {
            screen,
            orbits: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.orbits.iter().map(|o| o.items.len()).sum()
    }

    /// Side of the square that holds every ring: outer diameter plus one icon,
    /// so icons on the outer ring stay inside. Zero for an empty layout.
    pub fn extent(&self) -> f64 {
        self.orbits
            .last()
            .map(|o| 2.0 * o.radius + ITEM_SIZE_PX)
            .unwrap_or(0.0)
    }
}

/// Ring geometry for one screen bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingProfile {
    pub base_radius: f64,
    pub growth: f64,
}

impl ScreenSize {
    pub fn profile(&self) -> RingProfile {
        match self {
            ScreenSize::Mobile => RingProfile {
                base_radius: 90.0,
                growth: 0.45,
            },
            ScreenSize::Tablet => RingProfile {
                base_radius: 120.0,
                growth: 0.5,
            },
            ScreenSize::Desktop => RingProfile {
                base_radius: 150.0,
                growth: 0.53,
            },
        }
    }

    /// Default maximum ring count for the bucket.
    pub fn ring_limit(&self) -> usize {
        match self {
            ScreenSize::Mobile => 2,
            ScreenSize::Tablet | ScreenSize::Desktop => 3,
        }
    }
}

/// Radius of ring `index` under `profile`. Grows geometrically.
pub fn ring_radius(profile: RingProfile, index: usize) -> f64 {
    profile.base_radius * (1.0 + profile.growth).powi(index as i32)
}

/// Revolution time for a ring of `radius` carrying `mass`, clamped to the animation band.
pub fn ring_period(radius: f64, mass: f64) -> f64 {
    let mass = if mass.is_finite() && mass > 0.0 { mass } else { 1.0 };
    let raw = 2.0 * PI * (radius.powi(3) / (GRAVITY * mass)).sqrt();
    if raw.is_finite() {
        raw.clamp(MIN_PERIOD_SECS, MAX_PERIOD_SECS)
    } else {
        MAX_PERIOD_SECS
    }
}

/// Split `n` into `k` contiguous group sizes differing by at most one; earlier groups take the remainder.
fn group_sizes(n: usize, k: usize) -> Vec<usize> {
    if n == 0 || k == 0 {
        return Vec::new();
    }
    let k = k.min(n);
    let base = n / k;
    let extra = n % k;
    (0..k).map(|i| base + usize::from(i < extra)).collect()
}

/// Lay out `items` on at most `max_rings` rings for `screen`.
///
/// With `seed = Some(_)` each item gets a reproducible jitter of up to
/// ±[`JITTER_DEG`]; with `None` the layout is fully rigid.
pub fn compute_layout(
    items: &[TechItem],
    screen: ScreenSize,
    max_rings: usize,
    seed: Option<u64>,
) -> OrbitalLayout {
    let sizes = group_sizes(items.len(), max_rings);
    if sizes.is_empty() {
        return OrbitalLayout::empty(screen);
    }

    let mut sorted: Vec<&TechItem> = items.iter().collect();
    // Stable: equal masses keep catalog order.
    sorted.sort_by(|a, b| b.weight().total_cmp(&a.weight()));

    let profile = screen.profile();
    let ring_count = sizes.len();
    let mut rng = seed.map(StdRng::seed_from_u64);
    let mut orbits = Vec::with_capacity(ring_count);
    let mut cursor = 0;

    for (index, size) in sizes.into_iter().enumerate() {
        let members = &sorted[cursor..cursor + size];
        cursor += size;

        let radius = ring_radius(profile, index);
        let mass: f64 = members.iter().map(|t| t.weight()).sum();
        let phase_deg = index as f64 * 360.0 / (2.0 * ring_count as f64);
        let step = 360.0 / size as f64;

        let placed = members
            .iter()
            .enumerate()
            .map(|(slot, item)| {
                let jitter = rng
                    .as_mut()
                    .map(|r| r.random_range(-JITTER_DEG..=JITTER_DEG))
                    .unwrap_or(0.0);
                PlacedItem {
                    item: (*item).clone(),
                    angle_deg: (step * slot as f64 + phase_deg + jitter).rem_euclid(360.0),
                }
            })
            .collect();

        orbits.push(Orbit {
            radius,
            period_secs: ring_period(radius, mass),
            direction: if index % 2 == 0 {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            },
            phase_deg,
            items: placed,
        });
    }

    OrbitalLayout { screen, orbits }
}

/// Like [`compute_layout`] but takes a ring count from untrusted input.
/// Zero or negative counts give an empty layout.
pub fn compute_layout_checked(
    items: &[TechItem],
    screen: ScreenSize,
    max_rings: i64,
    seed: Option<u64>,
) -> OrbitalLayout {
    match usize::try_from(max_rings) {
        Ok(k) if k > 0 => compute_layout(items, screen, k, seed),
        _ => {
            tracing::debug!(max_rings, "rejecting non-positive ring count");
            OrbitalLayout::empty(screen)
        }
    }
}
