#![forbid(unsafe_code)]

//! Single owner of every gallery on the page.
//!
//! [`GalleryController`] routes host inputs to the right gallery and its
//! controllers. Unknown ids and re-entrant inputs are reported as ignored
//! dispatches, never as errors.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::command::{
    CompletionToken, GalleryDispatch, GalleryOutcome, GalleryPhase, IgnoredReason,
};
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::geometry::TrackGeometry;
use crate::gesture::Direction;
use crate::looping::LoopController;
use crate::position::{Application, PositionController};
use crate::registry::{Gallery, GalleryId, GalleryRegistry};
use crate::resize::{ResizeAdapter, ResizeDebouncer, ResizeTicket};
use crate::state::GalleryState;

fn unknown(phase: GalleryPhase, id: &GalleryId) -> GalleryDispatch {
    GalleryDispatch::ignored(phase, Some(id.clone()), None, IgnoredReason::UnknownGallery)
}

fn foreign(phase: GalleryPhase, id: &GalleryId, state: &GalleryState) -> GalleryDispatch {
    trace!(
        target: "folio::gallery",
        gallery = id.as_str(),
        phase = phase.as_str(),
        "transition event from a superseded transform"
    );
    GalleryDispatch::ignored(
        phase,
        Some(id.clone()),
        Some(state.current_index()),
        IgnoredReason::ForeignTransition,
    )
}

/// Owns the gallery registry and the shared resize debouncer.
#[derive(Debug)]
pub struct GalleryController {
    config: GalleryConfig,
    registry: GalleryRegistry,
    resize: ResizeDebouncer,
}

impl GalleryController {
    /// Create a controller after validating `config`.
    pub fn new(config: GalleryConfig) -> Result<Self> {
        config.validate()?;
        let resize = ResizeDebouncer::new(config.resize_debounce());
        Ok(Self {
            config,
            registry: GalleryRegistry::new(),
            resize,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GalleryConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &GalleryRegistry {
        &self.registry
    }

    #[must_use]
    pub fn state(&self, id: &GalleryId) -> Option<&GalleryState> {
        self.registry.get(id).map(|gallery| &gallery.state)
    }

    /// Set up the gallery living in `container_id`.
    ///
    /// Idempotent: a second call for the same container is an ignored
    /// dispatch with no commands. `geometry` is `None` while the document is
    /// still loading; call [`Self::geometry_ready`] once it is measurable.
    pub fn init_gallery(
        &mut self,
        container_id: &str,
        original_count: usize,
        geometry: Option<TrackGeometry>,
    ) -> Result<GalleryDispatch> {
        let id = GalleryId::from_container_id(container_id);
        if self.registry.contains(&id) {
            let index = self.state(&id).map(GalleryState::current_index);
            return Ok(GalleryDispatch::ignored(
                GalleryPhase::Init,
                Some(id),
                index,
                IgnoredReason::AlreadyInitialized,
            ));
        }

        let Some(mut state) = GalleryState::new(original_count, self.config.clones_count) else {
            warn!(
                target: "folio::gallery",
                container = container_id,
                "gallery has no items; skipped"
            );
            return Err(GalleryError::EmptyTrack {
                id: container_id.to_owned(),
            });
        };

        let mut commands = state.clone_plan();
        if let Some(geometry) = geometry {
            state.set_geometry(geometry);
            commands.extend(PositionController::apply_offset(&state, Application::Instant));
        }
        let index = state.current_index();
        debug!(
            target: "folio::gallery",
            gallery = id.as_str(),
            originals = original_count,
            clones = self.config.clones_count,
            total = state.len(),
            geometry_pending = state.geometry_pending(),
            "gallery initialized"
        );
        self.registry.register(id.clone(), Gallery::new(state));
        Ok(GalleryDispatch::with_commands(
            GalleryPhase::Init,
            Some(id),
            index,
            index,
            commands,
            GalleryOutcome::Applied,
        ))
    }

    /// Deferred first measurement, once the document has loaded.
    pub fn geometry_ready(&mut self, id: &GalleryId, geometry: TrackGeometry) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::GeometryReady, id);
        };
        if !gallery.state.geometry_pending() {
            return GalleryDispatch::ignored(
                GalleryPhase::GeometryReady,
                Some(id.clone()),
                Some(gallery.state.current_index()),
                IgnoredReason::GeometryAlreadyKnown,
            );
        }
        ResizeAdapter::recalculate(&mut gallery.state, id, geometry, GalleryPhase::GeometryReady)
    }

    /// Advance or retreat one item. Ignored for unknown ids or mid-animation.
    pub fn scroll_gallery(&mut self, id: &GalleryId, direction: Direction) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::Slide, id);
        };
        LoopController::slide(&mut gallery.state, id, direction, GalleryPhase::Slide)
    }

    /// The track's transform transition finished.
    ///
    /// `observed_px` is the track's rendered translation when the event fired,
    /// if the host can read it. An event observed short of the pending slide's
    /// target belongs to a superseded transition and is ignored.
    pub fn transition_end(
        &mut self,
        id: &GalleryId,
        token: CompletionToken,
        observed_px: Option<f64>,
    ) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::TransitionEnd, id);
        };
        if !LoopController::owns_transition(&gallery.state, observed_px) {
            return foreign(GalleryPhase::TransitionEnd, id, &gallery.state);
        }
        LoopController::complete(&mut gallery.state, id, token)
    }

    /// The track's transform transition was cancelled by the browser.
    ///
    /// Same attribution rule as [`Self::transition_end`].
    pub fn transition_cancel(
        &mut self,
        id: &GalleryId,
        observed_px: Option<f64>,
    ) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::TransitionCancel, id);
        };
        if !LoopController::owns_transition(&gallery.state, observed_px) {
            return foreign(GalleryPhase::TransitionCancel, id, &gallery.state);
        }
        LoopController::settle(&mut gallery.state, id, GalleryPhase::TransitionCancel)
    }

    pub fn touch_start(&mut self, id: &GalleryId, client_x: f64, at: Duration) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::TouchStart, id);
        };
        gallery.gesture.touch_start(&gallery.state, id, client_x, at)
    }

    pub fn touch_move(&mut self, id: &GalleryId, client_x: f64) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::TouchMove, id);
        };
        gallery
            .gesture
            .touch_move(&gallery.state, id, client_x, &self.config)
    }

    pub fn touch_end(&mut self, id: &GalleryId, at: Duration) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::TouchEnd, id);
        };
        gallery
            .gesture
            .touch_end(&mut gallery.state, id, at, &self.config)
    }

    pub fn touch_cancel(&mut self, id: &GalleryId) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::TouchCancel, id);
        };
        gallery.gesture.touch_cancel(&gallery.state, id)
    }

    /// Coarse swipe start. Recorded even while animating.
    pub fn swipe_start(&mut self, id: &GalleryId, screen_x: f64) {
        if let Some(gallery) = self.registry.get_mut(id) {
            gallery.swipe.start(screen_x);
        }
    }

    /// Coarse swipe end; commits through the same slide path as every input.
    pub fn swipe_end(&mut self, id: &GalleryId, screen_x: f64) -> GalleryDispatch {
        let Some(gallery) = self.registry.get_mut(id) else {
            return unknown(GalleryPhase::Swipe, id);
        };
        match gallery.swipe.end(screen_x, self.config.swipe_threshold_px) {
            Some(direction) => {
                LoopController::slide(&mut gallery.state, id, direction, GalleryPhase::Swipe)
            }
            None => GalleryDispatch::ignored(
                GalleryPhase::Swipe,
                Some(id.clone()),
                Some(gallery.state.current_index()),
                IgnoredReason::BelowThreshold,
            ),
        }
    }

    /// A window resize happened; arm (or re-arm) the debounce timer.
    pub fn request_resize(&mut self) -> ResizeTicket {
        self.resize.request()
    }

    /// Debounce timer fired. Only the latest ticket recalculates.
    ///
    /// `measure` returns fresh geometry per gallery; `None` keeps the old one.
    pub fn fire_resize<F>(&mut self, ticket: ResizeTicket, mut measure: F) -> Vec<GalleryDispatch>
    where
        F: FnMut(&GalleryId) -> Option<TrackGeometry>,
    {
        if !self.resize.fire(ticket) {
            return vec![GalleryDispatch::ignored(
                GalleryPhase::Resize,
                None,
                None,
                IgnoredReason::StaleResizeTicket,
            )];
        }
        let mut dispatches = Vec::with_capacity(self.registry.len());
        for id in self.registry.ids() {
            let Some(geometry) = measure(&id) else {
                continue;
            };
            if let Some(gallery) = self.registry.get_mut(&id) {
                dispatches.push(ResizeAdapter::recalculate(
                    &mut gallery.state,
                    &id,
                    geometry,
                    GalleryPhase::Resize,
                ));
            }
        }
        dispatches
    }
}

#[cfg(test)]
mod tests {
    use super::GalleryController;
    use crate::command::{GalleryOutcome, GalleryPhase, IgnoredReason, TrackCommand};
    use crate::config::GalleryConfig;
    use crate::error::GalleryError;
    use crate::geometry::TrackGeometry;
    use crate::gesture::Direction;
    use crate::registry::GalleryId;
    use std::time::Duration;

    fn controller() -> GalleryController {
        GalleryController::new(GalleryConfig::default()).expect("default config")
    }

    fn geometry() -> TrackGeometry {
        TrackGeometry::new(200.0, 20.0)
    }

    fn mariage() -> GalleryId {
        GalleryId::new("mariage")
    }

    fn finish(controller: &mut GalleryController, id: &GalleryId, direction: Direction) {
        let dispatch = controller.scroll_gallery(id, direction);
        let token = dispatch.await_completion.expect("animated slide");
        assert!(controller.transition_end(id, token, None).accepted());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GalleryConfig {
            clones_count: 1,
            ..GalleryConfig::default()
        };
        assert!(matches!(
            GalleryController::new(config),
            Err(GalleryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn init_registers_and_emits_clone_plan() {
        let mut controller = controller();
        let dispatch = controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        let clones = dispatch
            .commands
            .iter()
            .filter(|c| matches!(c, TrackCommand::CloneItem { .. }))
            .count();
        assert_eq!(clones, 8);
        assert_eq!(
            dispatch.commands[9],
            TrackCommand::SetTransform { offset_px: -880.0 }
        );
        let state = controller.state(&mariage()).expect("registered");
        assert_eq!(state.len(), 13);
        assert_eq!(state.current_index(), 4);
    }

    #[test]
    fn init_is_idempotent() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        let again = controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("second init");
        assert_eq!(again.ignored_reason(), Some(IgnoredReason::AlreadyInitialized));
        assert!(again.commands.is_empty());
        assert_eq!(controller.state(&mariage()).map(|s| s.len()), Some(13));
    }

    #[test]
    fn empty_gallery_does_not_register() {
        let mut controller = controller();
        let err = controller.init_gallery("sport-gallery", 0, None).unwrap_err();
        assert!(matches!(err, GalleryError::EmptyTrack { .. }));
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn deferred_geometry_is_applied_on_ready() {
        let mut controller = controller();
        let init = controller
            .init_gallery("portrait-gallery", 3, None)
            .expect("init");
        assert!(
            init.commands
                .iter()
                .all(|c| matches!(c, TrackCommand::CloneItem { .. }))
        );
        let id = GalleryId::new("portrait");
        let ready = controller.geometry_ready(&id, geometry());
        assert!(ready.accepted());
        assert!(ready.commands.contains(&TrackCommand::SetTransform { offset_px: -880.0 }));
        let again = controller.geometry_ready(&id, geometry());
        assert_eq!(again.ignored_reason(), Some(IgnoredReason::GeometryAlreadyKnown));
    }

    #[test]
    fn unknown_gallery_is_ignored() {
        let mut controller = controller();
        let dispatch = controller.scroll_gallery(&GalleryId::new("nope"), Direction::Forward);
        assert_eq!(dispatch.ignored_reason(), Some(IgnoredReason::UnknownGallery));
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        for _ in 0..5 {
            finish(&mut controller, &mariage(), Direction::Forward);
        }
        assert_eq!(controller.state(&mariage()).map(|s| s.current_index()), Some(4));
    }

    #[test]
    fn scroll_while_animating_changes_nothing() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        let first = controller.scroll_gallery(&mariage(), Direction::Forward);
        let second = controller.scroll_gallery(&mariage(), Direction::Backward);
        assert_eq!(second.ignored_reason(), Some(IgnoredReason::Animating));
        assert!(second.await_completion.is_none());
        let state = controller.state(&mariage()).expect("registered");
        assert_eq!(state.current_index(), 5);
        assert_eq!(state.pending_completion(), first.await_completion);
    }

    #[test]
    fn coarse_swipe_routes_through_slide() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        controller.swipe_start(&mariage(), 500.0);
        let dispatch = controller.swipe_end(&mariage(), 420.0);
        assert_eq!(dispatch.log.phase, GalleryPhase::Swipe);
        assert_eq!(dispatch.log.index_after, Some(5));

        controller.swipe_start(&mariage(), 500.0);
        let dropped = controller.swipe_end(&mariage(), 380.0);
        assert_eq!(dropped.ignored_reason(), Some(IgnoredReason::Animating));

        controller.swipe_start(&mariage(), 500.0);
        let short = controller.swipe_end(&mariage(), 480.0);
        assert_eq!(short.ignored_reason(), Some(IgnoredReason::BelowThreshold));
    }

    #[test]
    fn fine_commit_then_coarse_duplicate_is_dropped() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        let id = mariage();
        controller.swipe_start(&id, 600.0);
        let _ = controller.touch_start(&id, 600.0, Duration::ZERO);
        let _ = controller.touch_move(&id, 480.0);
        let fine = controller.touch_end(&id, Duration::from_millis(150));
        assert!(fine.await_completion.is_some());
        let coarse = controller.swipe_end(&id, 480.0);
        assert_eq!(coarse.ignored_reason(), Some(IgnoredReason::Animating));
        assert_eq!(controller.state(&id).map(|s| s.current_index()), Some(5));
    }

    #[test]
    fn resize_burst_recalculates_once() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        controller
            .init_gallery("sport-gallery", 2, Some(geometry()))
            .expect("init");
        let stale = controller.request_resize();
        let latest = controller.request_resize();

        let ignored = controller.fire_resize(stale, |_| Some(TrackGeometry::new(100.0, 10.0)));
        assert_eq!(ignored.len(), 1);
        assert_eq!(
            ignored[0].ignored_reason(),
            Some(IgnoredReason::StaleResizeTicket)
        );

        let applied = controller.fire_resize(latest, |_| Some(TrackGeometry::new(100.0, 10.0)));
        assert_eq!(applied.len(), 2);
        assert!(applied.iter().all(|d| d.log.outcome == GalleryOutcome::Applied));
        assert_eq!(
            controller.state(&mariage()).map(|s| s.geometry().item_width),
            Some(100.0)
        );
    }

    #[test]
    fn transition_cancel_settles() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        let _ = controller.scroll_gallery(&mariage(), Direction::Backward);
        let cancelled = controller.transition_cancel(&mariage(), None);
        assert_eq!(cancelled.log.outcome, GalleryOutcome::Rehomed { from: 3, to: 8 });
        assert!(!controller.state(&mariage()).expect("registered").is_animating());
    }

    #[test]
    fn superseded_snap_back_cancel_keeps_slide_in_flight() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        let id = mariage();
        let _ = controller.touch_start(&id, 300.0, Duration::ZERO);
        let _ = controller.touch_move(&id, 280.0);
        let released = controller.touch_end(&id, Duration::from_millis(400));
        assert_eq!(released.log.outcome, GalleryOutcome::SnappedBack);

        let slide = controller.scroll_gallery(&id, Direction::Backward);
        let token = slide.await_completion.expect("animated slide");

        // The snap-back was interrupted near rest (-880), well short of -660.
        let cancelled = controller.transition_cancel(&id, Some(-878.0));
        assert_eq!(
            cancelled.ignored_reason(),
            Some(IgnoredReason::ForeignTransition)
        );
        assert!(cancelled.commands.is_empty());
        let state = controller.state(&id).expect("registered");
        assert!(state.is_animating());
        assert_eq!(state.current_index(), 3);
        let retry = controller.scroll_gallery(&id, Direction::Backward);
        assert_eq!(retry.ignored_reason(), Some(IgnoredReason::Animating));

        let early_end = controller.transition_end(&id, token, Some(-800.0));
        assert_eq!(
            early_end.ignored_reason(),
            Some(IgnoredReason::ForeignTransition)
        );
        let finished = controller.transition_end(&id, token, Some(-660.0));
        assert_eq!(finished.log.outcome, GalleryOutcome::Rehomed { from: 3, to: 8 });
        assert!(!controller.state(&id).expect("registered").is_animating());
    }

    #[test]
    fn cancel_at_the_target_settles() {
        let mut controller = controller();
        controller
            .init_gallery("mariage-gallery", 5, Some(geometry()))
            .expect("init");
        let _ = controller.scroll_gallery(&mariage(), Direction::Forward);
        let cancelled = controller.transition_cancel(&mariage(), Some(-1100.0));
        assert!(cancelled.accepted());
        assert_eq!(controller.state(&mariage()).map(|s| s.current_index()), Some(5));
        assert!(!controller.state(&mariage()).expect("registered").is_animating());
    }
}
