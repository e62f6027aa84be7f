#![forbid(unsafe_code)]

//! Track offset computation and application.

use crate::command::{TrackCommand, TransitionMode};
use crate::state::GalleryState;

/// How an offset reaches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    /// Transition disabled for exactly one forced layout pass, then re-enabled.
    Instant,
    /// Uses the configured transition; completion arrives as transition-end.
    Animated,
}

/// Stateless offset math for a gallery track.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionController;

impl PositionController {
    /// Translation that brings slot `index` to the left edge of the viewport.
    #[must_use]
    pub fn offset_for(state: &GalleryState, index: usize) -> f64 {
        -(index as f64) * state.geometry().stride()
    }

    /// Translation for the current index.
    #[must_use]
    pub fn current_offset(state: &GalleryState) -> f64 {
        Self::offset_for(state, state.current_index())
    }

    /// Commands placing the track at the current index.
    #[must_use]
    pub fn apply_offset(state: &GalleryState, application: Application) -> Vec<TrackCommand> {
        Self::apply_raw(Self::current_offset(state), application)
    }

    /// Commands placing the track at an arbitrary offset.
    #[must_use]
    pub fn apply_raw(offset_px: f64, application: Application) -> Vec<TrackCommand> {
        match application {
            Application::Instant => vec![
                TrackCommand::SetTransition(TransitionMode::Disabled),
                TrackCommand::SetTransform { offset_px },
                TrackCommand::ForceReflow,
                TrackCommand::SetTransition(TransitionMode::Enabled),
            ],
            Application::Animated => vec![
                TrackCommand::SetTransition(TransitionMode::Enabled),
                TrackCommand::SetTransform { offset_px },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Application, PositionController};
    use crate::command::{TrackCommand, TransitionMode};
    use crate::geometry::TrackGeometry;
    use crate::state::GalleryState;
    use pretty_assertions::assert_eq;

    fn measured(originals: usize) -> GalleryState {
        let mut state = GalleryState::new(originals, 4).expect("non-empty");
        state.set_geometry(TrackGeometry::new(200.0, 20.0));
        state
    }

    #[test]
    fn offset_is_negative_index_times_stride() {
        let state = measured(5);
        assert_eq!(PositionController::current_offset(&state), -880.0);
        assert_eq!(PositionController::offset_for(&state, 0), 0.0);
        assert_eq!(PositionController::offset_for(&state, 9), -1980.0);
    }

    #[test]
    fn instant_application_brackets_a_reflow() {
        let state = measured(5);
        assert_eq!(
            PositionController::apply_offset(&state, Application::Instant),
            vec![
                TrackCommand::SetTransition(TransitionMode::Disabled),
                TrackCommand::SetTransform { offset_px: -880.0 },
                TrackCommand::ForceReflow,
                TrackCommand::SetTransition(TransitionMode::Enabled),
            ]
        );
    }

    #[test]
    fn animated_application_enables_transition_first() {
        let state = measured(5);
        assert_eq!(
            PositionController::apply_offset(&state, Application::Animated),
            vec![
                TrackCommand::SetTransition(TransitionMode::Enabled),
                TrackCommand::SetTransform { offset_px: -880.0 },
            ]
        );
    }

    #[test]
    fn unmeasured_geometry_yields_zero_offset() {
        let state = GalleryState::new(3, 4).expect("non-empty");
        assert_eq!(PositionController::current_offset(&state), 0.0);
    }
}
