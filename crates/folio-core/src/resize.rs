#![forbid(unsafe_code)]

//! Debounced geometry recalculation.
//!
//! The host calls [`ResizeDebouncer::request`] on every window resize and
//! (re)arms a timer with the returned delay. Only the ticket from the latest
//! request fires; older timers that slip through are rejected.

use std::time::Duration;

use tracing::debug;

use crate::command::{GalleryDispatch, GalleryOutcome, GalleryPhase};
use crate::geometry::TrackGeometry;
use crate::looping::LoopController;
use crate::position::{Application, PositionController};
use crate::registry::GalleryId;
use crate::state::GalleryState;

/// Handle for one scheduled recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTicket {
    generation: u64,
    /// How long the host waits before firing.
    pub delay: Duration,
}

/// Cancel-and-reschedule timer discipline: latest request wins.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    generation: u64,
    pending: Option<u64>,
}

impl ResizeDebouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a resize. Supersedes every earlier ticket.
    pub fn request(&mut self) -> ResizeTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(self.generation);
        ResizeTicket {
            generation: self.generation,
            delay: self.delay,
        }
    }

    /// Whether `ticket` is the latest request; consumes it if so.
    pub fn fire(&mut self, ticket: ResizeTicket) -> bool {
        if self.pending == Some(ticket.generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

/// Geometry refresh for one gallery.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeAdapter;

impl ResizeAdapter {
    /// Store fresh geometry and re-place the track instantly.
    ///
    /// An in-flight slide is settled first: the jump below cancels its CSS
    /// transition, so its transition-end would never arrive.
    pub fn recalculate(
        state: &mut GalleryState,
        gallery: &GalleryId,
        geometry: TrackGeometry,
        phase: GalleryPhase,
    ) -> GalleryDispatch {
        let before = state.current_index();
        let mut outcome = GalleryOutcome::Applied;
        if state.is_animating() {
            outcome = LoopController::settle(state, gallery, phase).log.outcome;
        }
        state.set_geometry(geometry);
        let commands = PositionController::apply_offset(state, Application::Instant);
        debug!(
            target: "folio::resize",
            gallery = gallery.as_str(),
            item_width = geometry.item_width,
            gap = geometry.gap,
            index = state.current_index(),
            "geometry recalculated"
        );
        GalleryDispatch::with_commands(
            phase,
            Some(gallery.clone()),
            before,
            state.current_index(),
            commands,
            outcome,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ResizeAdapter, ResizeDebouncer};
    use crate::command::{GalleryOutcome, GalleryPhase, TrackCommand, TransitionMode};
    use crate::geometry::TrackGeometry;
    use crate::gesture::Direction;
    use crate::looping::LoopController;
    use crate::registry::GalleryId;
    use crate::state::GalleryState;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn latest_request_wins() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(150));
        let first = debouncer.request();
        let second = debouncer.request();
        let third = debouncer.request();
        assert_eq!(third.delay, Duration::from_millis(150));
        assert!(!debouncer.fire(first));
        assert!(!debouncer.fire(second));
        assert!(debouncer.fire(third));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn ticket_fires_once() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(150));
        let ticket = debouncer.request();
        assert!(debouncer.fire(ticket));
        assert!(!debouncer.fire(ticket));
    }

    #[test]
    fn recalculate_reapplies_current_offset_instantly() {
        let mut state = GalleryState::new(5, 4).expect("non-empty");
        let gallery = GalleryId::new("portrait");
        let dispatch = ResizeAdapter::recalculate(
            &mut state,
            &gallery,
            TrackGeometry::new(150.0, 10.0),
            GalleryPhase::Resize,
        );
        assert!(!state.geometry_pending());
        assert_eq!(
            dispatch.commands,
            vec![
                TrackCommand::SetTransition(TransitionMode::Disabled),
                TrackCommand::SetTransform { offset_px: -640.0 },
                TrackCommand::ForceReflow,
                TrackCommand::SetTransition(TransitionMode::Enabled),
            ]
        );
    }

    #[test]
    fn recalculate_settles_in_flight_slide() {
        let mut state = GalleryState::new(5, 4).expect("non-empty");
        state.set_geometry(TrackGeometry::new(200.0, 20.0));
        state.set_current_index(8);
        let gallery = GalleryId::new("portrait");
        let _ = LoopController::slide(&mut state, &gallery, Direction::Forward, GalleryPhase::Slide);
        assert!(state.is_animating());

        let dispatch = ResizeAdapter::recalculate(
            &mut state,
            &gallery,
            TrackGeometry::new(100.0, 10.0),
            GalleryPhase::Resize,
        );
        assert!(!state.is_animating());
        assert_eq!(state.current_index(), 4);
        assert_eq!(dispatch.log.outcome, GalleryOutcome::Rehomed { from: 9, to: 4 });
        assert_eq!(
            dispatch.commands[1],
            TrackCommand::SetTransform { offset_px: -440.0 }
        );
    }
}
