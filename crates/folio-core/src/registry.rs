//! Registry of gallery instances keyed by [`GalleryId`].

use std::collections::HashMap;
use std::fmt;

use crate::gesture::{GestureInterpreter, SwipeDetector};
use crate::state::GalleryState;

const CONTAINER_SUFFIX: &str = "-gallery";

/// Stable gallery identifier, e.g. `"mariage"` for container `mariage-gallery`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GalleryId(String);

impl GalleryId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id from a container element id by dropping `-gallery`.
    #[must_use]
    pub fn from_container_id(container_id: &str) -> Self {
        Self::new(container_id.replacen(CONTAINER_SUFFIX, "", 1))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GalleryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything tracked for one carousel.
#[derive(Debug, Clone)]
pub struct Gallery {
    pub state: GalleryState,
    pub gesture: GestureInterpreter,
    pub swipe: SwipeDetector,
}

impl Gallery {
    #[must_use]
    pub fn new(state: GalleryState) -> Self {
        Self {
            state,
            gesture: GestureInterpreter::new(),
            swipe: SwipeDetector::new(),
        }
    }
}

/// Galleries discovered on the page. Entries are never removed.
#[derive(Debug, Default)]
pub struct GalleryRegistry {
    galleries: HashMap<GalleryId, Gallery>,
}

impl GalleryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a gallery unless one is already registered under `id`.
    ///
    /// Returns `false` (and drops `gallery`) when the id is taken.
    pub fn register(&mut self, id: GalleryId, gallery: Gallery) -> bool {
        if self.galleries.contains_key(&id) {
            return false;
        }
        self.galleries.insert(id, gallery);
        true
    }

    #[must_use]
    pub fn contains(&self, id: &GalleryId) -> bool {
        self.galleries.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &GalleryId) -> Option<&Gallery> {
        self.galleries.get(id)
    }

    pub fn get_mut(&mut self, id: &GalleryId) -> Option<&mut Gallery> {
        self.galleries.get_mut(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.galleries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.galleries.is_empty()
    }

    /// Registered ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<GalleryId> {
        let mut ids: Vec<GalleryId> = self.galleries.keys().cloned().collect();
        ids.sort();
        ids
    }
}
