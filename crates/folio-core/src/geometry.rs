#![forbid(unsafe_code)]

//! Track geometry and CSS value parsing.

/// Measured geometry of a gallery track.
///
/// Both values are non-negative and finite; [`TrackGeometry::new`] clamps
/// anything else to zero so a half-loaded page never produces NaN offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackGeometry {
    /// Rendered width of one item.
    pub item_width: f64,
    /// Horizontal gap between items.
    pub gap: f64,
}

impl TrackGeometry {
    #[must_use]
    pub fn new(item_width: f64, gap: f64) -> Self {
        Self {
            item_width: sanitize_px(item_width),
            gap: sanitize_px(gap),
        }
    }

    /// Build from a measured width and the raw computed `gap` style value.
    #[must_use]
    pub fn from_css(item_width: f64, gap_css: &str, fallback_gap: f64) -> Self {
        let gap = parse_css_px(gap_css).unwrap_or(fallback_gap);
        Self::new(item_width, gap)
    }

    /// Distance between the left edges of two neighbouring items.
    #[must_use]
    pub fn stride(&self) -> f64 {
        self.item_width + self.gap
    }

    /// Whether the geometry has been measured from a laid-out document.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.item_width > 0.0
    }
}

fn sanitize_px(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse a CSS length such as `"32px"`, `"1.5px"` or `"20"`.
///
/// Numeric prefix only, like `parseFloat`. `"normal"` and empty strings yield
/// `None`.
#[must_use]
pub fn parse_css_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    // Shorthand `gap` is `<row> <column>`; items sit along the column gap.
    let token = trimmed.split_whitespace().last()?;
    let end = token
        .char_indices()
        .find(|&(idx, ch)| {
            !(ch.is_ascii_digit() || ch == '.' || ((ch == '-' || ch == '+') && idx == 0))
        })
        .map_or(token.len(), |(idx, _)| idx);
    token[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Horizontal translation of a computed `transform` value.
///
/// Handles `none`, `matrix(a, b, c, d, tx, ty)`, `matrix3d(...)` (`tx` is the
/// 13th value) and the inline `translateX(<n>px)` form the host writes.
#[must_use]
pub fn parse_translate_x(transform: &str) -> Option<f64> {
    let transform = transform.trim();
    if transform.is_empty() || transform == "none" {
        return Some(0.0);
    }
    let open = transform.find('(')?;
    let close = transform.rfind(')')?;
    if close <= open {
        return None;
    }
    let args: Vec<&str> = transform[open + 1..close].split(',').map(str::trim).collect();
    let raw = match (&transform[..open], args.len()) {
        ("matrix", 6) => args[4],
        ("matrix3d", 16) => args[12],
        ("translateX", 1) | ("translate", 1 | 2) => args[0],
        _ => return None,
    };
    parse_css_px(raw)
}
