//! Pure arithmetic behind the page's decorative effects.
//!
//! Every function here turns measurements (scroll offsets, rectangles, random
//! samples supplied by the host) into [`StyleDecl`]s. The host owns timers,
//! observers and the DOM.

pub mod anchors;
pub mod nav;
pub mod parallax;
pub mod particles;
pub mod reveal;
pub mod ripple;

pub use anchors::{ANCHOR_SELECTOR, anchor_target};
pub use nav::{
    NAV_LINK_SELECTOR, SECTION_SELECTOR, SectionBounds, active_section, link_style, link_target,
};
pub use parallax::{FrameThrottle, HERO_SECTION_SELECTOR, HERO_TITLE_SELECTOR, ParallaxFrame};
pub use particles::{ParticleSpec, float_keyframes};
pub use reveal::{REVEAL_GROUPS, RevealGroup, RevealTrigger};
pub use ripple::{RIPPLE_KEYFRAMES, RIPPLE_TARGET_SELECTOR, Rect, RippleGeometry};

/// One inline style property to set on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecl {
    pub property: &'static str,
    pub value: String,
}

impl StyleDecl {
    #[must_use]
    pub fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

/// Format a number for CSS: at most three decimals, no trailing zeros.
#[must_use]
pub fn css_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    format!("{rounded}")
}

/// Milliseconds as a CSS seconds value, e.g. `600` -> `"0.6s"`.
#[must_use]
pub fn css_seconds(ms: u32) -> String {
    format!("{}s", css_number(f64::from(ms) / 1000.0))
}
