//! Floating particles rising through the hero section.
//!
//! Randomness comes from the host as uniform samples in `[0, 1)`.

use super::{StyleDecl, css_number};

pub const PARTICLE_COLOR: &str = "rgba(212, 165, 116, 0.3)";

fn unit(sample: f64) -> f64 {
    if sample.is_finite() {
        sample.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Size, position and speed of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    pub size_px: f64,
    pub left_percent: f64,
    pub float_duration_s: f64,
}

impl ParticleSpec {
    #[must_use]
    pub fn from_samples(size: f64, left: f64, duration: f64) -> Self {
        Self {
            size_px: unit(size) * 4.0 + 2.0,
            left_percent: unit(left) * 100.0,
            float_duration_s: unit(duration) * 3.0 + 4.0,
        }
    }

    #[must_use]
    pub fn style(&self) -> Vec<StyleDecl> {
        let size = format!("{}px", css_number(self.size_px));
        vec![
            StyleDecl::new("position", "absolute"),
            StyleDecl::new("width", size.clone()),
            StyleDecl::new("height", size),
            StyleDecl::new("border-radius", "50%"),
            StyleDecl::new("background", PARTICLE_COLOR),
            StyleDecl::new("left", format!("{}%", css_number(self.left_percent))),
            StyleDecl::new("bottom", "0"),
            StyleDecl::new("pointer-events", "none"),
            StyleDecl::new(
                "animation",
                format!("float {}s ease-in infinite", css_number(self.float_duration_s)),
            ),
        ]
    }
}

/// `float` keyframes; the horizontal drift is drawn once per page.
#[must_use]
pub fn float_keyframes(drift_sample: f64) -> String {
    let drift = unit(drift_sample) * 100.0 - 50.0;
    format!(
        "
    @keyframes float {{
        0% {{
            transform: translateY(0) translateX(0);
            opacity: 0;
        }}
        50% {{
            opacity: 0.6;
        }}
        100% {{
            transform: translateY(-100vh) translateX({}px);
            opacity: 0;
        }}
    }}
",
        css_number(drift)
    )
}

#[cfg(test)]
mod tests {
    use super::{ParticleSpec, float_keyframes};

    #[test]
    fn samples_map_to_ranges() {
        let low = ParticleSpec::from_samples(0.0, 0.0, 0.0);
        assert_eq!((low.size_px, low.left_percent, low.float_duration_s), (2.0, 0.0, 4.0));
        let high = ParticleSpec::from_samples(1.0, 1.0, 1.0);
        assert_eq!((high.size_px, high.left_percent, high.float_duration_s), (6.0, 100.0, 7.0));
    }

    #[test]
    fn bad_samples_are_clamped() {
        let spec = ParticleSpec::from_samples(f64::NAN, 7.0, -1.0);
        assert_eq!((spec.size_px, spec.left_percent, spec.float_duration_s), (2.0, 100.0, 4.0));
    }

    #[test]
    fn style_and_keyframes() {
        let spec = ParticleSpec::from_samples(0.5, 0.25, 0.5);
        let style = spec.style();
        assert_eq!(style[1].value, "4px");
        assert_eq!(style[5].value, "25%");
        assert_eq!(style[8].value, "float 5.5s ease-in infinite");
        assert!(float_keyframes(0.75).contains("translateX(25px)"));
        assert!(float_keyframes(0.5).contains("translateX(0px)"));
    }
}
