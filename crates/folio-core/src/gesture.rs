#![forbid(unsafe_code)]

//! Touch gesture interpretation for gallery tracks.
//!
//! Two detectors feed the same slide entry point:
//!
//! - [`GestureInterpreter`]: fine-grained drag. The track follows the finger
//!   (with rubber-band resistance beyond one item width) and the release
//!   either commits a one-item slide or snaps back, using a velocity-aware
//!   threshold.
//! - [`SwipeDetector`]: coarse page-level swipe on screen coordinates with a
//!   fixed distance threshold.
//!
//! # Invariants
//!
//! 1. A touch that starts while the gallery is animating is never tracked, so
//!    its moves and release are ignored.
//! 2. A release commits at most one item, however far or fast the flick.
//! 3. Snap-back never sets the re-entrancy guard.

use std::time::Duration;

use tracing::trace;

use crate::command::{
    GalleryDispatch, GalleryOutcome, GalleryPhase, IgnoredReason, TrackCommand, TransitionMode,
};
use crate::config::GalleryConfig;
use crate::looping::LoopController;
use crate::position::{Application, PositionController};
use crate::registry::GalleryId;
use crate::state::GalleryState;

/// Slide direction along the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards lower indices (content moves right).
    Backward,
    /// Towards higher indices (content moves left).
    Forward,
}

impl Direction {
    /// `> 0` is forward, `< 0` backward, `0` has no direction.
    #[must_use]
    pub const fn from_sign(sign: i32) -> Option<Self> {
        if sign > 0 {
            Some(Self::Forward)
        } else if sign < 0 {
            Some(Self::Backward)
        } else {
            None
        }
    }

    /// Direction a horizontal drag asks for: dragging left advances.
    #[must_use]
    pub fn from_drag(delta_x: f64) -> Self {
        if delta_x > 0.0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }

    /// Neighbouring index. Callers guarantee the result stays on the track.
    #[must_use]
    pub const fn step(self, index: usize) -> usize {
        match self {
            Self::Backward => index.saturating_sub(1),
            Self::Forward => index + 1,
        }
    }
}

/// What a finished drag asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureDecision {
    Commit(Direction),
    SnapBack,
}

/// Velocity-aware commit distance: `clamp(w/4, w/3, velocity * gain)`.
#[must_use]
pub fn swipe_threshold(item_width: f64, velocity_px_per_ms: f64, velocity_gain: f64) -> f64 {
    (velocity_px_per_ms * velocity_gain)
        .max(item_width / 4.0)
        .min(item_width / 3.0)
}

/// Drag displacement after resistance: movement beyond one item width is
/// scaled by `resistance`.
#[must_use]
pub fn rubber_band(delta_x: f64, item_width: f64, resistance: f64) -> f64 {
    let distance = delta_x.abs();
    if distance <= item_width {
        return delta_x;
    }
    let resisted = item_width + (distance - item_width) * resistance;
    resisted.copysign(delta_x)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragTracker {
    start_x: f64,
    started_at: Duration,
    delta_x: f64,
}

/// Fine-grained drag interpreter for one gallery.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    drag: Option<DragTracker>,
}

impl GestureInterpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Decide the outcome of a drag of `delta_x` pixels lasting `duration`.
    ///
    /// A zero duration counts as one millisecond.
    #[must_use]
    pub fn decide(
        delta_x: f64,
        duration: Duration,
        item_width: f64,
        velocity_gain: f64,
    ) -> GestureDecision {
        let duration_ms = (duration.as_secs_f64() * 1000.0).max(1.0);
        let velocity = delta_x.abs() / duration_ms;
        let threshold = swipe_threshold(item_width, velocity, velocity_gain);
        if delta_x.abs() > threshold {
            GestureDecision::Commit(Direction::from_drag(delta_x))
        } else {
            GestureDecision::SnapBack
        }
    }

    pub fn touch_start(
        &mut self,
        state: &GalleryState,
        gallery: &GalleryId,
        x: f64,
        at: Duration,
    ) -> GalleryDispatch {
        let index = state.current_index();
        if state.is_animating() {
            self.drag = None;
            return GalleryDispatch::ignored(
                GalleryPhase::TouchStart,
                Some(gallery.clone()),
                Some(index),
                IgnoredReason::Animating,
            );
        }
        self.drag = Some(DragTracker {
            start_x: x,
            started_at: at,
            delta_x: 0.0,
        });
        GalleryDispatch::with_commands(
            GalleryPhase::TouchStart,
            Some(gallery.clone()),
            index,
            index,
            vec![TrackCommand::SetTransition(TransitionMode::Disabled)],
            GalleryOutcome::Applied,
        )
    }

    pub fn touch_move(
        &mut self,
        state: &GalleryState,
        gallery: &GalleryId,
        x: f64,
        config: &GalleryConfig,
    ) -> GalleryDispatch {
        let index = state.current_index();
        if state.is_animating() {
            return GalleryDispatch::ignored(
                GalleryPhase::TouchMove,
                Some(gallery.clone()),
                Some(index),
                IgnoredReason::Animating,
            );
        }
        let Some(drag) = self.drag.as_mut() else {
            return GalleryDispatch::ignored(
                GalleryPhase::TouchMove,
                Some(gallery.clone()),
                Some(index),
                IgnoredReason::NoActiveDrag,
            );
        };
        drag.delta_x = x - drag.start_x;
        let displacement = rubber_band(
            drag.delta_x,
            state.geometry().item_width,
            config.drag_resistance,
        );
        let offset_px = PositionController::current_offset(state) + displacement;
        trace!(
            target: "folio::gesture",
            gallery = gallery.as_str(),
            delta_x = drag.delta_x,
            offset_px,
            "drag"
        );
        GalleryDispatch::with_commands(
            GalleryPhase::TouchMove,
            Some(gallery.clone()),
            index,
            index,
            vec![TrackCommand::SetTransform { offset_px }],
            GalleryOutcome::Applied,
        )
    }

    /// Release: commit a slide or snap back to the unchanged index.
    pub fn touch_end(
        &mut self,
        state: &mut GalleryState,
        gallery: &GalleryId,
        at: Duration,
        config: &GalleryConfig,
    ) -> GalleryDispatch {
        let index = state.current_index();
        let Some(drag) = self.drag.take() else {
            return GalleryDispatch::ignored(
                GalleryPhase::TouchEnd,
                Some(gallery.clone()),
                Some(index),
                IgnoredReason::NoActiveDrag,
            );
        };
        if state.is_animating() {
            return GalleryDispatch::ignored(
                GalleryPhase::TouchEnd,
                Some(gallery.clone()),
                Some(index),
                IgnoredReason::Animating,
            );
        }

        let duration = at.saturating_sub(drag.started_at);
        let decision = Self::decide(
            drag.delta_x,
            duration,
            state.geometry().item_width,
            config.velocity_gain,
        );
        trace!(
            target: "folio::gesture",
            gallery = gallery.as_str(),
            delta_x = drag.delta_x,
            duration_ms = duration.as_millis() as u64,
            ?decision,
            "drag released"
        );
        match decision {
            GestureDecision::Commit(direction) => {
                LoopController::slide(state, gallery, direction, GalleryPhase::TouchEnd)
            }
            GestureDecision::SnapBack => Self::snap_back(state, gallery, GalleryPhase::TouchEnd),
        }
    }

    /// Interrupted touch: return to rest without committing.
    pub fn touch_cancel(&mut self, state: &GalleryState, gallery: &GalleryId) -> GalleryDispatch {
        let index = state.current_index();
        if self.drag.take().is_none() {
            return GalleryDispatch::ignored(
                GalleryPhase::TouchCancel,
                Some(gallery.clone()),
                Some(index),
                IgnoredReason::NoActiveDrag,
            );
        }
        if state.is_animating() {
            return GalleryDispatch::ignored(
                GalleryPhase::TouchCancel,
                Some(gallery.clone()),
                Some(index),
                IgnoredReason::Animating,
            );
        }
        Self::snap_back(state, gallery, GalleryPhase::TouchCancel)
    }

    fn snap_back(state: &GalleryState, gallery: &GalleryId, phase: GalleryPhase) -> GalleryDispatch {
        let index = state.current_index();
        GalleryDispatch::with_commands(
            phase,
            Some(gallery.clone()),
            index,
            index,
            PositionController::apply_offset(state, Application::Animated),
            GalleryOutcome::SnappedBack,
        )
    }
}

/// Coarse page-level swipe detector on screen coordinates.
#[derive(Debug, Clone, Default)]
pub struct SwipeDetector {
    start_x: Option<f64>,
}

impl SwipeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, screen_x: f64) {
        self.start_x = Some(screen_x);
    }

    /// Direction of a finished swipe, or `None` below `threshold_px`.
    pub fn end(&mut self, screen_x: f64, threshold_px: f64) -> Option<Direction> {
        let start = self.start_x.take()?;
        let delta_x = screen_x - start;
        // Leftward advances, as for a drag. Coarse and fine swipes must never
        // disagree on one touch.
        (delta_x.abs() > threshold_px).then(|| Direction::from_drag(delta_x))
    }
}
