//! In-page anchor links scroll smoothly instead of jumping.

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Selector for the element an anchor `href` targets.
///
/// A bare `#` or a non-fragment href has no target.
#[must_use]
pub fn anchor_target(href: &str) -> Option<&str> {
    let fragment = href.strip_prefix('#')?;
    if fragment.trim().is_empty() {
        return None;
    }
    Some(href)
}

#[cfg(test)]
mod tests {
    use super::anchor_target;

    #[test]
    fn fragments_resolve() {
        assert_eq!(anchor_target("#portfolio"), Some("#portfolio"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/about"), None);
    }
}
