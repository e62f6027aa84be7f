//! Click ripple on hero and portfolio images.

use super::{StyleDecl, css_number, css_seconds};

pub const RIPPLE_TARGET_SELECTOR: &str = ".hero-image-box, .portfolio-image";
pub const RIPPLE_COLOR: &str = "rgba(212, 165, 116, 0.3)";

pub const RIPPLE_KEYFRAMES: &str = "
    @keyframes ripple {
        to {
            transform: scale(2);
            opacity: 0;
        }
    }
";

/// Client-space bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Square ripple centered on the click, relative to the clicked element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    #[must_use]
    pub fn compute(client_x: f64, client_y: f64, rect: Rect) -> Self {
        let size = rect.width.max(rect.height);
        Self {
            size,
            left: client_x - rect.left - size / 2.0,
            top: client_y - rect.top - size / 2.0,
        }
    }

    #[must_use]
    pub fn style(&self, lifetime_ms: u32) -> Vec<StyleDecl> {
        let size = format!("{}px", css_number(self.size));
        vec![
            StyleDecl::new("width", size.clone()),
            StyleDecl::new("height", size),
            StyleDecl::new("left", format!("{}px", css_number(self.left))),
            StyleDecl::new("top", format!("{}px", css_number(self.top))),
            StyleDecl::new("position", "absolute"),
            StyleDecl::new("border-radius", "50%"),
            StyleDecl::new("background", RIPPLE_COLOR),
            StyleDecl::new("transform", "scale(0)"),
            StyleDecl::new(
                "animation",
                format!("ripple {} ease-out", css_seconds(lifetime_ms)),
            ),
            StyleDecl::new("pointer-events", "none"),
        ]
    }
}
