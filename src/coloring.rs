//! Parcel coloring mode: a mapping from parcel identifier to zone
//! category, toggled from the map surface and exported as a JSON document.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::zone::ZoneCategory;

/// Fill used for parcels without a classification.
const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

/// Classification state for the coloring mode, keyed by parcel id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParcelColorMap {
    #[serde(rename = "parcelColors", default)]
    colors: BTreeMap<String, ZoneCategory>,
}

impl ParcelColorMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `category` to a parcel; tapping a parcel that already
    /// carries that category clears it instead.
    pub fn toggle(&mut self, parcel_id: &str, category: ZoneCategory) {
        if self.colors.get(parcel_id) == Some(&category) {
            self.colors.remove(parcel_id);
        } else {
            self.colors.insert(parcel_id.to_owned(), category);
        }
    }

    #[must_use]
    pub fn category_for(&self, parcel_id: &str) -> Option<ZoneCategory> {
        self.colors.get(parcel_id).copied()
    }

    /// Fill color for the rendering collaborator; transparent when the
    /// parcel is unclassified.
    #[must_use]
    pub fn fill_color_for(&self, parcel_id: &str) -> &'static str {
        self.category_for(parcel_id)
            .map_or(TRANSPARENT, ZoneCategory::fill_color)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }

    /// Loads a color map from a JSON document; a missing or unparseable
    /// file yields an empty map, like the zone documents.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Exports the map wholesale as `{"parcelColors": {...}}`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the document cannot be serialized or
    /// written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).map_err(StorageError::Serialize)?;
        fs::write(path, json).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), parcels = self.len(), "parcel colors exported");
        Ok(())
    }
}
