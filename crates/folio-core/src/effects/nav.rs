//! Active-section highlighting for the navigation bar.

use super::StyleDecl;

pub const SECTION_SELECTOR: &str = "section[id]";
pub const NAV_LINK_SELECTOR: &str = ".nav-links a";

const ACTIVE_COLOR: &str = "#d4a574";
const INACTIVE_COLOR: &str = "#5a5a5a";

/// Layout of one `section[id]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Id of the section under `scroll_y`; the last matching section wins.
#[must_use]
pub fn active_section(sections: &[SectionBounds], scroll_y: f64, offset: f64) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|section| {
            let top = section.top - offset;
            scroll_y >= top && scroll_y < top + section.height
        })
        .map(|section| section.id.as_str())
}

/// Section id a link points at (`"#about"` -> `"about"`).
#[must_use]
pub fn link_target(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or(href)
}

#[must_use]
pub fn link_style(active: bool) -> [StyleDecl; 2] {
    if active {
        [
            StyleDecl::new("font-weight", "bold"),
            StyleDecl::new("color", ACTIVE_COLOR),
        ]
    } else {
        [
            StyleDecl::new("font-weight", "normal"),
            StyleDecl::new("color", INACTIVE_COLOR),
        ]
    }
}
