#![forbid(unsafe_code)]

//! Core: infinite gallery carousels and page-effect arithmetic for the folio site.
//!
//! # Role in folio
//! `folio-core` owns every piece of state the site has. It never touches the
//! DOM: the host (`folio-web`) pushes inputs such as touches, resizes and
//! transition-end signals, and applies the [`TrackCommand`]s it gets back.
//!
//! # Primary responsibilities
//! - **GalleryController**: owns the [`GalleryRegistry`] and routes every
//!   host input to the right gallery.
//! - **GalleryState**: per-carousel record of item slots (originals plus
//!   clones), current index, measured geometry and loop phase.
//! - **LoopController**: animated slides and the invisible re-homing jump that
//!   makes the carousel wrap around.
//! - **GestureInterpreter / SwipeDetector**: touch input to committed slides.
//! - **ResizeDebouncer**: latest-wins resize recalculation.
//! - **effects**: reveal, parallax, ripple, navigation and particle math.
//!
//! # Execution model
//! Everything runs on the UI thread. The loop phase of a gallery is the only
//! mutual-exclusion mechanism: while a slide is in flight every other slide or
//! gesture for that gallery is dropped.

pub mod command;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod looping;
pub mod position;
pub mod registry;
pub mod resize;
pub mod state;

pub use command::{
    ClonePlacement, CompletionToken, GalleryDispatch, GalleryLogEntry, GalleryOutcome,
    GalleryPhase, IgnoredReason, TrackCommand, TransitionMode,
};
pub use config::{EffectsConfig, GalleryConfig, PageConfig};
pub use controller::GalleryController;
pub use error::{GalleryError, Result};
pub use geometry::{TrackGeometry, parse_translate_x};
pub use gesture::{Direction, GestureDecision, GestureInterpreter, SwipeDetector};
pub use looping::LoopController;
pub use position::{Application, PositionController};
pub use registry::{Gallery, GalleryId, GalleryRegistry};
pub use resize::{ResizeAdapter, ResizeDebouncer, ResizeTicket};
pub use state::{GalleryState, ItemSlot, LoopPhase, SlotKind};
