#![forbid(unsafe_code)]

//! Platform-independent page core wrapping [`GalleryController`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use std::collections::HashMap;
use std::time::Duration;

use folio_core::effects::{FrameThrottle, ParallaxFrame};
use folio_core::{
    CompletionToken, Direction, GalleryController, GalleryDispatch, GalleryId, GalleryLogEntry,
    GalleryOutcome, GalleryPhase, IgnoredReason, PageConfig, ResizeTicket, Result, TrackGeometry,
};
use tracing::warn;

/// Oldest lines are dropped once this many are waiting for `take_logs`.
const MAX_CACHED_LOGS: usize = 512;

/// Host milliseconds to a duration. Noisy input (NaN/inf/negative) clamps to
/// zero so gesture timing never panics.
#[must_use]
pub fn sanitize_ms(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    let max_secs = Duration::MAX.as_secs_f64();
    let secs = (ms / 1000.0).min(max_secs);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Platform-independent page state behind `FolioPage`.
pub struct PageCore {
    config: PageConfig,
    controller: GalleryController,
    /// Completion token per gallery, taken by the first transition-end.
    held: HashMap<GalleryId, CompletionToken>,
    parallax: FrameThrottle,
    cached_logs: Vec<String>,
}

impl PageCore {
    pub fn new(config: PageConfig) -> Result<Self> {
        config.validate()?;
        let controller = GalleryController::new(config.gallery.clone())?;
        Ok(Self {
            config,
            controller,
            held: HashMap::new(),
            parallax: FrameThrottle::new(),
            cached_logs: Vec::new(),
        })
    }

    /// Build from optional JSON; missing or blank input means defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self> {
        match json.map(str::trim) {
            Some(json) if !json.is_empty() => Self::new(PageConfig::from_json(json)?),
            _ => Self::new(PageConfig::default()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Effective configuration as JSON, defaults filled in.
    pub fn config_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.config)?)
    }

    #[must_use]
    pub fn gallery_index(&self, id: &str) -> Option<usize> {
        self.controller
            .state(&GalleryId::new(id))
            .map(|state| state.current_index())
    }

    #[must_use]
    pub fn is_animating(&self, id: &str) -> bool {
        self.controller
            .state(&GalleryId::new(id))
            .is_some_and(|state| state.is_animating())
    }

    #[must_use]
    pub fn is_initialized(&self, container_id: &str) -> bool {
        self.controller
            .registry()
            .contains(&GalleryId::from_container_id(container_id))
    }

    #[must_use]
    pub fn geometry_pending(&self, id: &str) -> bool {
        self.controller
            .state(&GalleryId::new(id))
            .is_some_and(|state| state.geometry_pending())
    }

    /// Set up one gallery. Failures are logged and reported as `None`.
    pub fn init_gallery(
        &mut self,
        container_id: &str,
        item_count: usize,
        geometry: Option<TrackGeometry>,
    ) -> Option<GalleryDispatch> {
        match self
            .controller
            .init_gallery(container_id, item_count, geometry)
        {
            Ok(dispatch) => Some(self.record(dispatch)),
            Err(err) => {
                warn!(
                    target: "folio_web::dom",
                    container = container_id,
                    error = %err,
                    "gallery skipped"
                );
                self.push_log(format!("gallery_init_error container={container_id}: {err}"));
                None
            }
        }
    }

    pub fn geometry_ready(&mut self, id: &str, geometry: TrackGeometry) -> GalleryDispatch {
        let dispatch = self
            .controller
            .geometry_ready(&GalleryId::new(id), geometry);
        self.record(dispatch)
    }

    /// `direction > 0` advances, `< 0` retreats, `0` is a no-op.
    pub fn scroll_gallery(&mut self, id: &str, direction: i32) -> Option<GalleryDispatch> {
        let direction = Direction::from_sign(direction)?;
        let dispatch = self
            .controller
            .scroll_gallery(&GalleryId::new(id), direction);
        Some(self.record(dispatch))
    }

    /// Hand back the held completion token, if any, for `id`.
    ///
    /// `observed_px` is the track's rendered translation when the event
    /// fired. An event from a superseded transition leaves the token held.
    pub fn transition_end(
        &mut self,
        id: &str,
        observed_px: Option<f64>,
    ) -> Option<GalleryDispatch> {
        let id = GalleryId::new(id);
        let token = self.held.get(&id).copied()?;
        let dispatch = self.controller.transition_end(&id, token, observed_px);
        if !is_foreign(&dispatch) {
            self.held.remove(&id);
        }
        Some(self.record(dispatch))
    }

    pub fn transition_cancel(&mut self, id: &str, observed_px: Option<f64>) -> GalleryDispatch {
        let id = GalleryId::new(id);
        let dispatch = self.controller.transition_cancel(&id, observed_px);
        if !is_foreign(&dispatch) {
            self.held.remove(&id);
        }
        self.record(dispatch)
    }

    /// Touch start. Non-finite coordinates are dropped.
    pub fn touch_start(&mut self, id: &str, client_x: f64, at_ms: f64) -> Option<GalleryDispatch> {
        if !client_x.is_finite() {
            return None;
        }
        let dispatch =
            self.controller
                .touch_start(&GalleryId::new(id), client_x, sanitize_ms(at_ms));
        Some(self.record(dispatch))
    }

    pub fn touch_move(&mut self, id: &str, client_x: f64) -> Option<GalleryDispatch> {
        if !client_x.is_finite() {
            return None;
        }
        let dispatch = self.controller.touch_move(&GalleryId::new(id), client_x);
        Some(self.record(dispatch))
    }

    pub fn touch_end(&mut self, id: &str, at_ms: f64) -> GalleryDispatch {
        let dispatch = self
            .controller
            .touch_end(&GalleryId::new(id), sanitize_ms(at_ms));
        self.record(dispatch)
    }

    pub fn touch_cancel(&mut self, id: &str) -> GalleryDispatch {
        let dispatch = self.controller.touch_cancel(&GalleryId::new(id));
        self.record(dispatch)
    }

    pub fn swipe_start(&mut self, id: &str, screen_x: f64) {
        if screen_x.is_finite() {
            self.controller.swipe_start(&GalleryId::new(id), screen_x);
        }
    }

    pub fn swipe_end(&mut self, id: &str, screen_x: f64) -> Option<GalleryDispatch> {
        if !screen_x.is_finite() {
            return None;
        }
        let dispatch = self.controller.swipe_end(&GalleryId::new(id), screen_x);
        Some(self.record(dispatch))
    }

    pub fn request_resize(&mut self) -> ResizeTicket {
        self.controller.request_resize()
    }

    pub fn fire_resize<F>(&mut self, ticket: ResizeTicket, measure: F) -> Vec<GalleryDispatch>
    where
        F: FnMut(&GalleryId) -> Option<TrackGeometry>,
    {
        self.controller
            .fire_resize(ticket, measure)
            .into_iter()
            .map(|dispatch| self.record(dispatch))
            .collect()
    }

    /// Whether a scroll event should schedule a parallax frame.
    pub fn request_parallax_frame(&mut self) -> bool {
        self.parallax.request()
    }

    /// Run the scheduled parallax frame.
    pub fn parallax_frame(&mut self, scrolled: f64, viewport_height: f64) -> Option<ParallaxFrame> {
        self.parallax.frame_done();
        ParallaxFrame::compute(scrolled, viewport_height, &self.config.effects)
    }

    /// Drain accumulated log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.cached_logs)
    }

    pub fn push_log(&mut self, line: String) {
        if self.cached_logs.len() >= MAX_CACHED_LOGS {
            self.cached_logs.remove(0);
        }
        self.cached_logs.push(line);
    }

    fn record(&mut self, dispatch: GalleryDispatch) -> GalleryDispatch {
        if let (Some(token), Some(id)) = (dispatch.await_completion, dispatch.log.gallery.as_ref()) {
            self.held.insert(id.clone(), token);
        }
        let drag_step = dispatch.log.phase == GalleryPhase::TouchMove && dispatch.accepted();
        if !drag_step {
            self.push_log(format_gallery_log_entry(&dispatch.log));
        }
        dispatch
    }
}

fn is_foreign(dispatch: &GalleryDispatch) -> bool {
    dispatch.ignored_reason() == Some(IgnoredReason::ForeignTransition)
}

fn format_gallery_log_entry(log: &GalleryLogEntry) -> String {
    let gallery = log
        .gallery
        .as_ref()
        .map_or_else(|| "-".to_owned(), ToString::to_string);
    let before = log
        .index_before
        .map_or_else(|| "-".to_owned(), |index| index.to_string());
    let after = log
        .index_after
        .map_or_else(|| "-".to_owned(), |index| index.to_string());
    let outcome = match log.outcome {
        GalleryOutcome::Applied => "applied".to_owned(),
        GalleryOutcome::Rehomed { from, to } => format!("rehomed from={from} to={to}"),
        GalleryOutcome::SnappedBack => "snapped_back".to_owned(),
        GalleryOutcome::Ignored(reason) => format!("ignored reason={}", reason.as_str()),
    };
    format!(
        "gallery phase={} id={gallery} index_before={before} index_after={after} outcome={outcome}",
        log.phase.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::{MAX_CACHED_LOGS, PageCore, format_gallery_log_entry, sanitize_ms};
    use folio_core::{
        GalleryError, GalleryId, GalleryLogEntry, GalleryOutcome, GalleryPhase, IgnoredReason,
        TrackCommand, TrackGeometry,
    };
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn mounted() -> PageCore {
        let mut core = PageCore::from_json(None).expect("default config");
        core.init_gallery("mariage-gallery", 5, Some(TrackGeometry::new(200.0, 20.0)))
            .expect("init");
        let _ = core.take_logs();
        core
    }

    #[test]
    fn sanitize_ms_clamps_noise() {
        assert_eq!(sanitize_ms(f64::NAN), Duration::ZERO);
        assert_eq!(sanitize_ms(f64::NEG_INFINITY), Duration::ZERO);
        assert_eq!(sanitize_ms(-5.0), Duration::ZERO);
        assert_eq!(sanitize_ms(150.0), Duration::from_millis(150));
        assert_eq!(sanitize_ms(f64::INFINITY), Duration::ZERO);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let core = PageCore::from_json(Some(r#"{"gallery":{"swipe_threshold_px":80}}"#))
            .expect("partial config");
        assert_eq!(core.config().gallery.swipe_threshold_px, 80.0);
        assert_eq!(core.config().gallery.clones_count, 4);
        assert!(PageCore::from_json(Some("   ")).is_ok());
        let effective: serde_json::Value =
            serde_json::from_str(&core.config_json().expect("serializable")).expect("json");
        assert_eq!(effective["gallery"]["resize_debounce_ms"], 150);
        assert_eq!(effective["effects"]["nav_offset_px"], 250.0);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            PageCore::from_json(Some("not json")),
            Err(GalleryError::Json(_))
        ));
        assert!(matches!(
            PageCore::from_json(Some(r#"{"gallery":{"clones_count":2}}"#)),
            Err(GalleryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn transition_end_uses_held_token_once() {
        let mut core = mounted();
        let dispatch = core.scroll_gallery("mariage", 1).expect("direction");
        assert!(dispatch.await_completion.is_some());
        assert!(core.is_animating("mariage"));

        let finished = core.transition_end("mariage", None).expect("held token");
        assert!(finished.accepted());
        assert!(!core.is_animating("mariage"));
        assert_eq!(core.gallery_index("mariage"), Some(5));
        assert!(core.transition_end("mariage", None).is_none());
    }

    #[test]
    fn superseded_cancel_keeps_the_token_held() {
        let mut core = mounted();
        let _ = core.touch_start("mariage", 300.0, 0.0);
        let _ = core.touch_move("mariage", 280.0);
        let snapped = core.touch_end("mariage", 400.0);
        assert_eq!(snapped.log.outcome, GalleryOutcome::SnappedBack);

        let slide = core.scroll_gallery("mariage", -1).expect("direction");
        assert!(slide.await_completion.is_some());
        assert_eq!(core.gallery_index("mariage"), Some(3));

        // Snap-back cancelled one pixel short of rest.
        let cancelled = core.transition_cancel("mariage", Some(-878.0));
        assert_eq!(
            cancelled.ignored_reason(),
            Some(IgnoredReason::ForeignTransition)
        );
        assert!(core.is_animating("mariage"));
        let retry = core.scroll_gallery("mariage", -1).expect("direction");
        assert_eq!(retry.ignored_reason(), Some(IgnoredReason::Animating));

        let finished = core
            .transition_end("mariage", Some(-660.0))
            .expect("token still held");
        assert_eq!(finished.log.outcome, GalleryOutcome::Rehomed { from: 3, to: 8 });
        assert!(!core.is_animating("mariage"));
        let logs = core.take_logs();
        assert!(
            logs.iter().any(|line| line.contains("reason=foreign_transition")),
            "got: {logs:?}"
        );
    }

    #[test]
    fn zero_direction_is_noop() {
        let mut core = mounted();
        assert!(core.scroll_gallery("mariage", 0).is_none());
        assert_eq!(core.gallery_index("mariage"), Some(4));
    }

    #[test]
    fn scroll_while_animating_is_dropped_and_logged() {
        let mut core = mounted();
        let _ = core.scroll_gallery("mariage", -1);
        let dropped = core.scroll_gallery("mariage", -1).expect("direction");
        assert_eq!(dropped.ignored_reason(), Some(IgnoredReason::Animating));
        let logs = core.take_logs();
        assert!(
            logs.iter()
                .any(|line| line.contains("phase=slide") && line.contains("reason=animating")),
            "expected an ignored slide entry, got: {logs:?}"
        );
    }

    #[test]
    fn touch_moves_are_not_logged() {
        let mut core = mounted();
        let _ = core.touch_start("mariage", 300.0, 0.0);
        let moved = core.touch_move("mariage", 280.0).expect("finite");
        assert_eq!(moved.commands.len(), 1);
        let _ = core.touch_end("mariage", 400.0);
        let logs = core.take_logs();
        assert_eq!(logs.len(), 2, "got: {logs:?}");
        assert!(logs[1].contains("outcome=snapped_back"));
    }

    #[test]
    fn non_finite_coordinates_are_dropped() {
        let mut core = mounted();
        assert!(core.touch_start("mariage", f64::NAN, 0.0).is_none());
        assert!(core.touch_move("mariage", f64::INFINITY).is_none());
        assert!(core.swipe_end("mariage", f64::NAN).is_none());
    }

    #[test]
    fn missing_items_log_an_init_error() {
        let mut core = PageCore::from_json(None).expect("default config");
        assert!(core.init_gallery("sport-gallery", 0, None).is_none());
        let logs = core.take_logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].starts_with("gallery_init_error container=sport-gallery"));
        assert!(!core.is_initialized("sport-gallery"));
    }

    #[test]
    fn deferred_geometry_round_trip() {
        let mut core = PageCore::from_json(None).expect("default config");
        core.init_gallery("portrait-gallery", 3, None).expect("init");
        assert!(core.is_initialized("portrait-gallery"));
        assert!(core.geometry_pending("portrait"));
        let ready = core.geometry_ready("portrait", TrackGeometry::new(150.0, 10.0));
        assert!(ready.commands.contains(&TrackCommand::SetTransform { offset_px: -640.0 }));
        assert!(!core.geometry_pending("portrait"));
    }

    #[test]
    fn resize_keeps_only_latest_ticket() {
        let mut core = mounted();
        let stale = core.request_resize();
        let latest = core.request_resize();
        assert_eq!(latest.delay, Duration::from_millis(150));
        let ignored = core.fire_resize(stale, |_| Some(TrackGeometry::new(100.0, 10.0)));
        assert_eq!(
            ignored[0].ignored_reason(),
            Some(IgnoredReason::StaleResizeTicket)
        );
        let applied = core.fire_resize(latest, |_| Some(TrackGeometry::new(100.0, 10.0)));
        assert_eq!(applied.len(), 1);
        assert!(applied[0].accepted());
    }

    #[test]
    fn resize_mid_slide_drops_held_token() {
        let mut core = mounted();
        let _ = core.scroll_gallery("mariage", 1);
        let ticket = core.request_resize();
        let _ = core.fire_resize(ticket, |_| Some(TrackGeometry::new(100.0, 10.0)));
        assert!(!core.is_animating("mariage"));
        let late = core.transition_end("mariage", None).expect("token still held");
        assert_eq!(late.ignored_reason(), Some(IgnoredReason::NoPendingCompletion));
    }

    #[test]
    fn parallax_frames_are_throttled() {
        let mut core = mounted();
        assert!(core.request_parallax_frame());
        assert!(!core.request_parallax_frame());
        let frame = core.parallax_frame(100.0, 800.0).expect("inside hero");
        assert_eq!(frame.title_offset_px, 40.0);
        assert!(core.request_parallax_frame());
    }

    #[test]
    fn log_cache_is_bounded() {
        let mut core = mounted();
        for i in 0..MAX_CACHED_LOGS + 10 {
            core.push_log(format!("line {i}"));
        }
        let logs = core.take_logs();
        assert_eq!(logs.len(), MAX_CACHED_LOGS);
        assert_eq!(logs[0], "line 10");
    }

    #[test]
    fn log_line_format() {
        let line = format_gallery_log_entry(&GalleryLogEntry {
            phase: GalleryPhase::TransitionEnd,
            gallery: Some(GalleryId::new("sport")),
            index_before: Some(9),
            index_after: Some(4),
            outcome: GalleryOutcome::Rehomed { from: 9, to: 4 },
        });
        assert_eq!(
            line,
            "gallery phase=transition_end id=sport index_before=9 index_after=4 outcome=rehomed from=9 to=4"
        );
    }
}
