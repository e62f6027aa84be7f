//! Staggered fade-in of page blocks.

use super::{StyleDecl, css_number};

const EASE_OUT: &str = "cubic-bezier(0.4, 0, 0.2, 1)";
const DURATION: &str = "0.8s";

/// What makes a group visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTrigger {
    /// An intersection observer reports the element on screen.
    Intersection,
    /// A one-shot timer after setup.
    Timer,
}

/// A set of elements that fade in together with a per-index delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealGroup {
    pub selector: &'static str,
    pub offset_y_px: f64,
    /// Initial scale; `None` leaves scale out of the transform.
    pub scale: Option<f64>,
    pub stagger_s: f64,
    pub easing: &'static str,
    pub trigger: RevealTrigger,
}

pub const REVEAL_GROUPS: [RevealGroup; 4] = [
    RevealGroup {
        selector: ".hero-image-box",
        offset_y_px: 50.0,
        scale: Some(0.95),
        stagger_s: 0.2,
        easing: EASE_OUT,
        trigger: RevealTrigger::Intersection,
    },
    RevealGroup {
        selector: ".portfolio-item",
        offset_y_px: 40.0,
        scale: Some(0.95),
        stagger_s: 0.2,
        easing: EASE_OUT,
        trigger: RevealTrigger::Intersection,
    },
    RevealGroup {
        selector: ".contact-item, .contact-photo",
        offset_y_px: 40.0,
        scale: Some(0.95),
        stagger_s: 0.25,
        easing: EASE_OUT,
        trigger: RevealTrigger::Intersection,
    },
    RevealGroup {
        selector: ".gallery-section",
        offset_y_px: 30.0,
        scale: None,
        stagger_s: 0.2,
        easing: "ease",
        trigger: RevealTrigger::Timer,
    },
];

impl RevealGroup {
    fn transform(&self, offset_y_px: f64, scale: Option<f64>) -> String {
        let translate = format!("translateY({}px)", css_number(offset_y_px));
        match scale {
            Some(scale) => format!("{translate} scale({})", css_number(scale)),
            None => translate,
        }
    }

    /// Hidden state for the `index`-th element of the group.
    #[must_use]
    pub fn initial_style(&self, index: usize) -> Vec<StyleDecl> {
        #[allow(clippy::cast_precision_loss)]
        let delay = index as f64 * self.stagger_s;
        vec![
            StyleDecl::new("opacity", "0"),
            StyleDecl::new("transform", self.transform(self.offset_y_px, self.scale)),
            StyleDecl::new(
                "transition",
                format!("all {DURATION} {} {}s", self.easing, css_number(delay)),
            ),
        ]
    }

    #[must_use]
    pub fn revealed_style(&self) -> Vec<StyleDecl> {
        let transform = match self.scale {
            Some(_) => "translateY(0) scale(1)",
            None => "translateY(0)",
        };
        vec![
            StyleDecl::new("opacity", "1"),
            StyleDecl::new("transform", transform),
        ]
    }
}
