#![forbid(unsafe_code)]

//! Infinite wraparound via clone re-homing.
//!
//! # State Machine
//!
//! ```text
//!   Idle --slide--> Animating --transition end--> (Resetting) --> Idle
//! ```
//!
//! - `slide` is accepted only in `Idle`. It moves the index one slot and
//!   applies the offset with animation, handing the host a completion token.
//! - On completion, an index inside the originals goes straight back to
//!   `Idle`. An index in clone territory passes through `Resetting`: the index
//!   is replaced by its real twin and the offset is applied instantly. The
//!   clone and its twin render identically, so the jump is invisible.
//!
//! # Failure Modes
//!
//! - A transition-end that never arrives leaves the gallery `Animating`.
//!   Hosts that can observe cancellation call [`LoopController::settle`].
//! - A slide whose target offset equals the current one (unmeasured geometry)
//!   cannot produce a transition-end; it completes synchronously.

use tracing::{debug, trace};

use crate::command::{
    CompletionToken, GalleryDispatch, GalleryOutcome, GalleryPhase, IgnoredReason, TrackCommand,
};
use crate::gesture::Direction;
use crate::position::{Application, PositionController};
use crate::registry::GalleryId;
use crate::state::{GalleryState, LoopPhase};

/// Offsets closer than this are treated as "no movement".
const MOVEMENT_EPSILON_PX: f64 = 1e-6;

/// Rendered offsets within this distance of the slide target count as "there".
const ARRIVAL_TOLERANCE_PX: f64 = 0.5;

/// Slide and completion logic shared by every input path.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopController;

impl LoopController {
    /// Real slot equivalent to `index`.
    #[must_use]
    pub fn mirrored_index(index: usize, clones_count: usize, original_count: usize) -> usize {
        let shifted = index as isize - clones_count as isize;
        clones_count + shifted.rem_euclid(original_count as isize) as usize
    }

    /// Whether a transition event observed with the track at `observed_px`
    /// can belong to the pending slide.
    ///
    /// Both a finished and a cancelled transform transition leave the track at
    /// its end value. While the pending slide is still running the track sits
    /// short of the target, so the event came from a transition it superseded.
    /// Without an observation the event is trusted.
    #[must_use]
    pub fn owns_transition(state: &GalleryState, observed_px: Option<f64>) -> bool {
        match observed_px {
            Some(observed) if observed.is_finite() && state.is_animating() => {
                (observed - PositionController::current_offset(state)).abs() <= ARRIVAL_TOLERANCE_PX
            }
            _ => true,
        }
    }

    /// Start a one-item slide.
    ///
    /// Dropped (not queued) while a slide is in flight.
    pub fn slide(
        state: &mut GalleryState,
        gallery: &GalleryId,
        direction: Direction,
        phase: GalleryPhase,
    ) -> GalleryDispatch {
        let before = state.current_index();
        if state.is_animating() {
            trace!(
                target: "folio::gallery",
                gallery = gallery.as_str(),
                index = before,
                "slide dropped while animating"
            );
            return GalleryDispatch::ignored(
                phase,
                Some(gallery.clone()),
                Some(before),
                IgnoredReason::Animating,
            );
        }

        let from_offset = PositionController::current_offset(state);
        let target = direction.step(before);
        state.set_current_index(target);
        let to_offset = PositionController::current_offset(state);
        let mut commands = PositionController::apply_offset(state, Application::Animated);

        if (to_offset - from_offset).abs() < MOVEMENT_EPSILON_PX {
            // No transform change means no transition-end; finish now.
            state.set_phase(LoopPhase::Resetting);
            let (finish, outcome) = Self::finish(state, gallery);
            commands.extend(finish);
            return GalleryDispatch::with_commands(
                phase,
                Some(gallery.clone()),
                before,
                state.current_index(),
                commands,
                outcome,
            );
        }

        let token = state.issue_token();
        state.set_phase(LoopPhase::Animating { token, direction });
        trace!(
            target: "folio::gallery",
            gallery = gallery.as_str(),
            from = before,
            to = target,
            offset_px = to_offset,
            "slide started"
        );
        let mut dispatch = GalleryDispatch::with_commands(
            phase,
            Some(gallery.clone()),
            before,
            target,
            commands,
            GalleryOutcome::Applied,
        );
        dispatch.await_completion = Some(token);
        dispatch
    }

    /// Resolve the pending transition-end identified by `token`.
    pub fn complete(
        state: &mut GalleryState,
        gallery: &GalleryId,
        token: CompletionToken,
    ) -> GalleryDispatch {
        let before = state.current_index();
        match state.phase() {
            LoopPhase::Animating { token: pending, .. } if pending == token => {
                let (commands, outcome) = Self::finish(state, gallery);
                GalleryDispatch::with_commands(
                    GalleryPhase::TransitionEnd,
                    Some(gallery.clone()),
                    before,
                    state.current_index(),
                    commands,
                    outcome,
                )
            }
            LoopPhase::Animating { .. } => GalleryDispatch::ignored(
                GalleryPhase::TransitionEnd,
                Some(gallery.clone()),
                Some(before),
                IgnoredReason::StaleCompletion,
            ),
            LoopPhase::Idle | LoopPhase::Resetting => GalleryDispatch::ignored(
                GalleryPhase::TransitionEnd,
                Some(gallery.clone()),
                Some(before),
                IgnoredReason::NoPendingCompletion,
            ),
        }
    }

    /// Finish an in-flight slide without waiting for its transition-end.
    ///
    /// The pending token is invalidated; handing it back later is ignored.
    pub fn settle(
        state: &mut GalleryState,
        gallery: &GalleryId,
        phase: GalleryPhase,
    ) -> GalleryDispatch {
        let before = state.current_index();
        if state.pending_completion().is_none() {
            return GalleryDispatch::ignored(
                phase,
                Some(gallery.clone()),
                Some(before),
                IgnoredReason::NoPendingCompletion,
            );
        }
        let (commands, outcome) = Self::finish(state, gallery);
        debug!(
            target: "folio::gallery",
            gallery = gallery.as_str(),
            phase = phase.as_str(),
            index = state.current_index(),
            "in-flight slide settled early"
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

    /// Clear the guard, re-homing first when the index sits on a clone.
    fn finish(state: &mut GalleryState, gallery: &GalleryId) -> (Vec<TrackCommand>, GalleryOutcome) {
        let index = state.current_index();
        if state.is_real_index(index) {
            state.set_phase(LoopPhase::Idle);
            return (Vec::new(), GalleryOutcome::Applied);
        }

        state.set_phase(LoopPhase::Resetting);
        let real = Self::mirrored_index(index, state.clones_count(), state.original_count());
        state.set_current_index(real);
        let commands = PositionController::apply_offset(state, Application::Instant);
        state.set_phase(LoopPhase::Idle);
        debug!(
            target: "folio::gallery",
            gallery = gallery.as_str(),
            from = index,
            to = real,
            "re-homed from clone"
        );
        (commands, GalleryOutcome::Rehomed { from: index, to: real })
    }
}
