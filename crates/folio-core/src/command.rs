#![forbid(unsafe_code)]

//! Host-facing commands and dispatch records.
//!
//! Every gallery operation returns a [`GalleryDispatch`]: an ordered list of
//! [`TrackCommand`]s for the host to apply to the track element, an optional
//! [`CompletionToken`] the host must hand back when the started transition
//! ends, and a structured [`GalleryLogEntry`].

use crate::registry::GalleryId;

/// Whether the track's CSS transition is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    /// `transition: none`.
    Disabled,
    /// The configured transition string.
    Enabled,
}

/// Where a cloned item is inserted into the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClonePlacement {
    /// Before the track's current first child.
    Prepend,
    /// After the track's current last child.
    Append,
}

/// One DOM mutation for the host to perform, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackCommand {
    SetTransition(TransitionMode),
    /// `transform: translateX(<offset_px>px)`.
    SetTransform { offset_px: f64 },
    /// Read a layout property so pending style changes are flushed.
    ForceReflow,
    /// Deep-clone original item `source` and insert it.
    CloneItem {
        source: usize,
        placement: ClonePlacement,
    },
}

/// Opaque handle for one pending transition-end.
///
/// Handed out by a slide that starts an animation. The host keeps it until the
/// transition ends and passes it back exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompletionToken(u64);

impl CompletionToken {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Input or lifecycle step a dispatch was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryPhase {
    Init,
    GeometryReady,
    Slide,
    TransitionEnd,
    TransitionCancel,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    Swipe,
    Resize,
}

impl GalleryPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::GeometryReady => "geometry_ready",
            Self::Slide => "slide",
            Self::TransitionEnd => "transition_end",
            Self::TransitionCancel => "transition_cancel",
            Self::TouchStart => "touch_start",
            Self::TouchMove => "touch_move",
            Self::TouchEnd => "touch_end",
            Self::TouchCancel => "touch_cancel",
            Self::Swipe => "swipe",
            Self::Resize => "resize",
        }
    }
}

/// Deterministic reason an input was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    UnknownGallery,
    /// A slide is in flight; the input is dropped, not queued.
    Animating,
    NoActiveDrag,
    StaleCompletion,
    NoPendingCompletion,
    /// A transition-end or cancel for a transform the pending slide did not
    /// start (e.g. an interrupted snap-back).
    ForeignTransition,
    StaleResizeTicket,
    AlreadyInitialized,
    GeometryAlreadyKnown,
    /// Swipe or drag below its commit threshold.
    BelowThreshold,
}

impl IgnoredReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownGallery => "unknown_gallery",
            Self::Animating => "animating",
            Self::NoActiveDrag => "no_active_drag",
            Self::StaleCompletion => "stale_completion",
            Self::NoPendingCompletion => "no_pending_completion",
            Self::ForeignTransition => "foreign_transition",
            Self::StaleResizeTicket => "stale_resize_ticket",
            Self::AlreadyInitialized => "already_initialized",
            Self::GeometryAlreadyKnown => "geometry_already_known",
            Self::BelowThreshold => "below_threshold",
        }
    }
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryOutcome {
    Applied,
    /// The index crossed into clone territory and was moved to its real twin.
    Rehomed { from: usize, to: usize },
    /// A drag ended without committing and the track returns to rest.
    SnappedBack,
    Ignored(IgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryLogEntry {
    pub phase: GalleryPhase,
    pub gallery: Option<GalleryId>,
    pub index_before: Option<usize>,
    pub index_after: Option<usize>,
    pub outcome: GalleryOutcome,
}

/// Result of one gallery operation.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryDispatch {
    pub commands: Vec<TrackCommand>,
    pub await_completion: Option<CompletionToken>,
    pub log: GalleryLogEntry,
}

impl GalleryDispatch {
    pub(crate) fn ignored(
        phase: GalleryPhase,
        gallery: Option<GalleryId>,
        index: Option<usize>,
        reason: IgnoredReason,
    ) -> Self {
        Self {
            commands: Vec::new(),
            await_completion: None,
            log: GalleryLogEntry {
                phase,
                gallery,
                index_before: index,
                index_after: index,
                outcome: GalleryOutcome::Ignored(reason),
            },
        }
    }

    pub(crate) fn with_commands(
        phase: GalleryPhase,
        gallery: Option<GalleryId>,
        index_before: usize,
        index_after: usize,
        commands: Vec<TrackCommand>,
        outcome: GalleryOutcome,
    ) -> Self {
        Self {
            commands,
            await_completion: None,
            log: GalleryLogEntry {
                phase,
                gallery,
                index_before: Some(index_before),
                index_after: Some(index_after),
                outcome,
            },
        }
    }

    #[must_use]
    pub const fn accepted(&self) -> bool {
        !matches!(self.log.outcome, GalleryOutcome::Ignored(_))
    }

    #[must_use]
    pub const fn ignored_reason(&self) -> Option<IgnoredReason> {
        match self.log.outcome {
            GalleryOutcome::Ignored(reason) => Some(reason),
            _ => None,
        }
    }
}
