#![forbid(unsafe_code)]

//! Per-carousel state.
//!
//! # Invariants
//!
//! 1. `items.len() == original_count + 2 * clones_count`; originals occupy
//!    `clones_count..clones_count + original_count`.
//! 2. The slot at position `p` shows original `(p - clones_count) mod original_count`,
//!    so a clone is always visually identical to the real item it stands in for.
//! 3. In [`LoopPhase::Idle`], `current_index` lies inside the originals range.
//!    It only enters clone territory while a slide is in flight.
//! 4. `clones_count` and `original_count` never change after construction.

use std::ops::Range;

use crate::command::{ClonePlacement, CompletionToken, TrackCommand};
use crate::geometry::TrackGeometry;
use crate::gesture::Direction;

/// What a track slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Clone placed before the originals, mirroring the tail.
    LeadingClone,
    Original,
    /// Clone placed after the originals, mirroring the head.
    TrailingClone,
}

/// One rendered item of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot {
    /// Index of the original item this slot displays.
    pub source: usize,
    pub kind: SlotKind,
}

/// Loop lifecycle of a gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    /// An animated slide is waiting for its transition-end.
    Animating {
        token: CompletionToken,
        direction: Direction,
    },
    /// Instant jump back from clone territory; never outlives one dispatch.
    Resetting,
}

/// Mutable record for one carousel.
#[derive(Debug, Clone)]
pub struct GalleryState {
    items: Vec<ItemSlot>,
    current_index: usize,
    geometry: TrackGeometry,
    geometry_pending: bool,
    phase: LoopPhase,
    clones_count: usize,
    original_count: usize,
    next_token: u64,
}

impl GalleryState {
    /// Lay out `original_count` items with `clones_count` clones on each side.
    ///
    /// Returns `None` for an empty gallery. Geometry starts unmeasured and
    /// pending; see [`GalleryState::set_geometry`].
    #[must_use]
    pub fn new(original_count: usize, clones_count: usize) -> Option<Self> {
        if original_count == 0 {
            return None;
        }
        let total = original_count + 2 * clones_count;
        let items = (0..total)
            .map(|position| {
                let kind = if position < clones_count {
                    SlotKind::LeadingClone
                } else if position < clones_count + original_count {
                    SlotKind::Original
                } else {
                    SlotKind::TrailingClone
                };
                ItemSlot {
                    source: source_for_position(position, clones_count, original_count),
                    kind,
                }
            })
            .collect();
        Some(Self {
            items,
            current_index: clones_count,
            geometry: TrackGeometry::default(),
            geometry_pending: true,
            phase: LoopPhase::Idle,
            clones_count,
            original_count,
            next_token: 1,
        })
    }

    /// DOM insertions that turn the bare originals into [`Self::items`].
    ///
    /// Clones are emitted pairwise: append head item `i`, then prepend tail
    /// item `n - 1 - i`, so the host can apply them in one pass.
    #[must_use]
    pub fn clone_plan(&self) -> Vec<TrackCommand> {
        let n = self.original_count;
        let mut plan = Vec::with_capacity(self.clones_count * 2);
        for i in 0..self.clones_count {
            plan.push(TrackCommand::CloneItem {
                source: i % n,
                placement: ClonePlacement::Append,
            });
            plan.push(TrackCommand::CloneItem {
                source: n - 1 - (i % n),
                placement: ClonePlacement::Prepend,
            });
        }
        plan
    }

    #[must_use]
    pub fn items(&self) -> &[ItemSlot] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub const fn clones_count(&self) -> usize {
        self.clones_count
    }

    #[must_use]
    pub const fn original_count(&self) -> usize {
        self.original_count
    }

    /// Slot range occupied by the originals.
    #[must_use]
    pub const fn real_range(&self) -> Range<usize> {
        self.clones_count..self.clones_count + self.original_count
    }

    #[must_use]
    pub fn is_real_index(&self, index: usize) -> bool {
        self.real_range().contains(&index)
    }

    #[must_use]
    pub const fn geometry(&self) -> TrackGeometry {
        self.geometry
    }

    /// Whether geometry is still waiting for the document to finish loading.
    #[must_use]
    pub const fn geometry_pending(&self) -> bool {
        self.geometry_pending
    }

    #[must_use]
    pub const fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// The re-entrancy guard: true while a slide is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        !matches!(self.phase, LoopPhase::Idle)
    }

    /// Token of the pending transition-end, if any.
    #[must_use]
    pub const fn pending_completion(&self) -> Option<CompletionToken> {
        match self.phase {
            LoopPhase::Animating { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Original index shown at the current position.
    #[must_use]
    pub fn current_source(&self) -> usize {
        self.items[self.current_index].source
    }

    pub(crate) fn set_current_index(&mut self, index: usize) {
        debug_assert!(index < self.items.len(), "index {index} out of track bounds");
        self.current_index = index;
    }

    pub(crate) fn set_geometry(&mut self, geometry: TrackGeometry) {
        self.geometry = geometry;
        self.geometry_pending = false;
    }

    pub(crate) fn set_phase(&mut self, phase: LoopPhase) {
        self.phase = phase;
    }

    pub(crate) fn issue_token(&mut self) -> CompletionToken {
        let token = CompletionToken::new(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        token
    }
}

fn source_for_position(position: usize, clones_count: usize, original_count: usize) -> usize {
    let shifted = position as isize - clones_count as isize;
    shifted.rem_euclid(original_count as isize) as usize
}
