#![forbid(unsafe_code)]

//! Hero parallax driven by the window scroll offset.
//!
//! # Invariants
//!
//! 1. Past one viewport height nothing is recomputed; the last applied frame
//!    stays in place.
//! 2. At most one animation frame is pending at a time ([`FrameThrottle`]).

use super::{StyleDecl, css_number};
use crate::config::EffectsConfig;

pub const HERO_TITLE_SELECTOR: &str = ".hero-title";
pub const HERO_SECTION_SELECTOR: &str = ".hero-section";

/// Styles for one parallax frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxFrame {
    pub title_offset_px: f64,
    pub title_opacity: f64,
    pub hero_scale: f64,
}

impl ParallaxFrame {
    /// Frame for `scrolled` pixels, or `None` once the hero is off screen.
    #[must_use]
    pub fn compute(scrolled: f64, viewport_height: f64, config: &EffectsConfig) -> Option<Self> {
        if !scrolled.is_finite() || !viewport_height.is_finite() || viewport_height <= 0.0 {
            return None;
        }
        if scrolled >= viewport_height {
            return None;
        }
        Some(Self {
            title_offset_px: scrolled * config.parallax_title_factor,
            title_opacity: (1.0 - scrolled / config.parallax_fade_distance_px).max(0.0),
            hero_scale: 1.0 + (scrolled / viewport_height) * config.parallax_zoom_factor,
        })
    }

    #[must_use]
    pub fn title_style(&self) -> Vec<StyleDecl> {
        vec![
            StyleDecl::new(
                "transform",
                format!("translateY({}px)", css_number(self.title_offset_px)),
            ),
            StyleDecl::new("opacity", css_number(self.title_opacity)),
        ]
    }

    #[must_use]
    pub fn hero_style(&self) -> Vec<StyleDecl> {
        vec![StyleDecl::new(
            "transform",
            format!("scale({})", css_number(self.hero_scale)),
        )]
    }
}

/// One-frame throttle for scroll handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: false }
    }

    /// Whether the caller should schedule a frame now.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn frame_done(&mut self) {
        self.pending = false;
    }
}
