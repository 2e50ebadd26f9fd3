//! In-memory state machine for the polygon being drawn in one zone
//! category, plus the already-saved rings for that category.
//!
//! Single logical owner, no internal locking: callers must not interleave
//! mutations of the same session. Geometry work is synchronous; only the
//! store boundary does I/O.

use tracing::debug;

use crate::error::Result;
use crate::geom::{merge_rings, point_in_ring, rings_overlap, GeoPoint, Ring};
use crate::storage::ZoneStore;
use crate::zone::ZoneCategory;

pub struct ZoneDrawingSession<S: ZoneStore> {
    store: S,
    active_category: ZoneCategory,
    saved_rings: Vec<Ring>,
    current_draft: Ring,
}

impl<S: ZoneStore> ZoneDrawingSession<S> {
    /// Opens a session on `category`, loading its saved rings.
    pub fn new(store: S, category: ZoneCategory) -> Self {
        let saved_rings = store.read(category);
        Self {
            store,
            active_category: category,
            saved_rings,
            current_draft: Ring::new(),
        }
    }

    #[must_use]
    pub fn active_category(&self) -> ZoneCategory {
        self.active_category
    }

    /// Saved rings for the active category, for the rendering collaborator.
    #[must_use]
    pub fn saved_rings(&self) -> &[Ring] {
        &self.saved_rings
    }

    /// The ring currently under construction.
    #[must_use]
    pub fn current_draft(&self) -> &[GeoPoint] {
        &self.current_draft
    }

    /// Appends a tapped point to the draft. No self-intersection check.
    pub fn add_point(&mut self, latitude: f64, longitude: f64) {
        self.current_draft.push(GeoPoint::new(latitude, longitude));
    }

    /// Drops the draft without saving.
    pub fn discard_draft(&mut self) {
        self.current_draft.clear();
    }

    /// Commits the draft into the saved set and persists the category.
    ///
    /// If the draft overlaps a saved ring, the *first* overlapping entry is
    /// replaced by the merge of the two; further overlaps are not chained
    /// within one save. Drafts with fewer than 3 points are "no polygon"
    /// and are appended without overlap scanning. An empty draft is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the updated document cannot be written;
    /// the in-memory state is updated regardless.
    pub fn save(&mut self) -> Result<()> {
        if self.current_draft.is_empty() {
            return Ok(());
        }

        let draft = std::mem::take(&mut self.current_draft);
        let overlapping = if draft.len() < 3 {
            None
        } else {
            self.saved_rings
                .iter()
                .position(|ring| rings_overlap(&draft, ring))
        };

        match overlapping {
            Some(index) => {
                let merged = merge_rings(&draft, &self.saved_rings[index]);
                debug!(
                    index,
                    draft_points = draft.len(),
                    merged_points = merged.len(),
                    "draft overlaps saved ring, replacing with merge"
                );
                self.saved_rings[index] = merged;
            }
            None => self.saved_rings.push(draft),
        }

        self.persist()
    }

    /// Removes the saved ring at `index` and persists. Out-of-range
    /// indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the updated document cannot be written.
    pub fn delete_at(&mut self, index: usize) -> Result<()> {
        if index >= self.saved_rings.len() {
            return Ok(());
        }
        self.saved_rings.remove(index);
        debug!(index, remaining = self.saved_rings.len(), "saved ring deleted");
        self.persist()
    }

    /// Index of the first saved ring containing `point`, for the
    /// long-press-to-delete flow.
    #[must_use]
    pub fn hit_test_delete(&self, point: &GeoPoint) -> Option<usize> {
        self.saved_rings
            .iter()
            .position(|ring| point_in_ring(point, ring))
    }

    /// Switches the active category: persists nothing, reloads the saved
    /// rings for the new category, clears the draft.
    pub fn switch_category(&mut self, category: ZoneCategory) {
        self.active_category = category;
        self.saved_rings = self.store.read(category);
        self.current_draft.clear();
    }

    /// Consumes the session, returning the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<()> {
        self.store.write(self.active_category, &self.saved_rings)
    }
}
