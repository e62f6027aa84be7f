#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field has a default matching the production site, and every struct is
//! `#[serde(default)]`, so a host can pass a partial JSON object (or nothing).
//!
//! ```
//! use folio_core::config::PageConfig;
//!
//! let config = PageConfig::from_json(r#"{"gallery":{"clones_count":6}}"#).unwrap();
//! assert_eq!(config.gallery.clones_count, 6);
//! assert_eq!(config.gallery.resize_debounce_ms, 150);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};

/// Carousel tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Clones inserted on each side of the originals. Must cover the visible window.
    pub clones_count: usize,
    /// Number of items visible at once.
    pub visible_count: usize,
    /// Gap used when the computed `gap` style is empty or unparsable.
    pub fallback_gap_px: f64,
    /// CSS transition applied to the track while animations are enabled.
    pub transition: String,
    /// Scale applied to drag distance beyond one item width (0.0–1.0).
    pub drag_resistance: f64,
    /// Multiplier turning drag velocity (px/ms) into a threshold candidate.
    pub velocity_gain: f64,
    /// Fixed distance for the coarse page-level swipe detector.
    pub swipe_threshold_px: f64,
    /// Quiet period before a burst of resizes triggers recalculation.
    pub resize_debounce_ms: u64,
    /// Container element ids scanned at page load.
    pub container_ids: Vec<String>,
    /// Selector of the track inside a container.
    pub track_selector: String,
    /// Selector of the items inside a track.
    pub item_selector: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            clones_count: 4,
            visible_count: 4,
            fallback_gap_px: 32.0,
            transition: "transform 0.5s cubic-bezier(0.4, 0, 0.2, 1)".to_owned(),
            drag_resistance: 0.3,
            velocity_gain: 100.0,
            swipe_threshold_px: 50.0,
            resize_debounce_ms: 150,
            container_ids: vec![
                "mariage-gallery".to_owned(),
                "sport-gallery".to_owned(),
                "portrait-gallery".to_owned(),
            ],
            track_selector: ".gallery-track".to_owned(),
            item_selector: ".gallery-item".to_owned(),
        }
    }
}

impl GalleryConfig {
    /// Debounce interval as a [`Duration`].
    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clones_count == 0 {
            return Err(GalleryError::invalid("clones_count must be positive"));
        }
        if self.clones_count < self.visible_count {
            return Err(GalleryError::invalid(format!(
                "clones_count ({}) must cover visible_count ({})",
                self.clones_count, self.visible_count
            )));
        }
        if !(0.0..=1.0).contains(&self.drag_resistance) {
            return Err(GalleryError::invalid(format!(
                "drag_resistance must be within [0, 1], got {}",
                self.drag_resistance
            )));
        }
        for (name, value) in [
            ("fallback_gap_px", self.fallback_gap_px),
            ("velocity_gain", self.velocity_gain),
            ("swipe_threshold_px", self.swipe_threshold_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GalleryError::invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.transition.trim().is_empty() {
            return Err(GalleryError::invalid("transition must not be empty"));
        }
        Ok(())
    }
}

/// Tuning for the one-shot page effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    /// Delay before `.gallery-section` blocks fade in.
    pub gallery_section_delay_ms: u32,
    pub particle_interval_ms: u32,
    pub particle_lifetime_ms: u32,
    pub ripple_lifetime_ms: u32,
    /// Distance above a section's top at which it becomes the active one.
    pub nav_offset_px: f64,
    pub parallax_title_factor: f64,
    pub parallax_fade_distance_px: f64,
    pub parallax_zoom_factor: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.15,
            reveal_root_margin: "0px 0px -80px 0px".to_owned(),
            gallery_section_delay_ms: 100,
            particle_interval_ms: 2000,
            particle_lifetime_ms: 7000,
            ripple_lifetime_ms: 600,
            nav_offset_px: 250.0,
            parallax_title_factor: 0.4,
            parallax_fade_distance_px: 400.0,
            parallax_zoom_factor: 0.1,
        }
    }
}

impl EffectsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(GalleryError::invalid(format!(
                "reveal_threshold must be within [0, 1], got {}",
                self.reveal_threshold
            )));
        }
        if !self.parallax_fade_distance_px.is_finite() || self.parallax_fade_distance_px <= 0.0 {
            return Err(GalleryError::invalid(
                "parallax_fade_distance_px must be finite and positive",
            ));
        }
        if self.particle_interval_ms == 0 {
            return Err(GalleryError::invalid("particle_interval_ms must be positive"));
        }
        Ok(())
    }
}

/// Whole-page configuration handed to the host at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub gallery: GalleryConfig,
    pub effects: EffectsConfig,
}

impl PageConfig {
    /// Parse and validate a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.gallery.validate()?;
        self.effects.validate()
    }
}
