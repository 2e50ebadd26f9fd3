//! Persistence boundary for zone documents.
//!
//! One JSON document per [`ZoneCategory`], shape
//! `{"polygons": [[{"latitude": …, "longitude": …}, …], …]}`. Reads never
//! fail: an absent or unparseable document means "no saved polygons for
//! this category". Writes replace the document wholesale.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::geom::Ring;
use crate::zone::ZoneCategory;

/// Wire shape of a persisted zone document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneDocument {
    pub polygons: Vec<Ring>,
}

/// Storage collaborator for saved zone rings.
pub trait ZoneStore {
    /// Reads the saved rings for a category. Absent or malformed documents
    /// silently yield an empty list.
    fn read(&self, category: ZoneCategory) -> Vec<Ring>;

    /// Replaces the persisted document for a category.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the document cannot be serialized or
    /// written.
    fn write(&mut self, category: ZoneCategory, rings: &[Ring]) -> Result<()>;
}

/// File-backed store: one JSON file per category under a base directory.
#[derive(Debug)]
pub struct FileZoneStore {
    dir: PathBuf,
}

impl FileZoneStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, category: ZoneCategory) -> PathBuf {
        self.dir.join(category.file_name())
    }
}

impl ZoneStore for FileZoneStore {
    fn read(&self, category: ZoneCategory) -> Vec<Ring> {
        let path = self.path_for(category);
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<ZoneDocument>(&content) {
                Ok(document) => document.polygons,
                Err(err) => {
                    debug!(path = %path.display(), %err, "unparseable zone document, treating as empty");
                    Vec::new()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "no zone document yet");
                Vec::new()
            }
        }
    }

    fn write(&mut self, category: ZoneCategory, rings: &[Ring]) -> Result<()> {
        let path = self.path_for(category);
        let document = ZoneDocument {
            polygons: rings.to_vec(),
        };
        let json = serde_json::to_string(&document).map_err(StorageError::Serialize)?;
        fs::write(&path, json).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), rings = rings.len(), "zone document saved");
        Ok(())
    }
}

/// In-memory store, used in tests and demos.
#[derive(Debug, Default)]
pub struct MemoryZoneStore {
    documents: HashMap<ZoneCategory, Vec<Ring>>,
}

impl MemoryZoneStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last document written for a category, as its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if serialization fails.
    pub fn document_json(&self, category: ZoneCategory) -> Result<String> {
        let document = ZoneDocument {
            polygons: self.documents.get(&category).cloned().unwrap_or_default(),
        };
        let json = serde_json::to_string(&document).map_err(StorageError::Serialize)?;
        Ok(json)
    }
}

impl ZoneStore for MemoryZoneStore {
    fn read(&self, category: ZoneCategory) -> Vec<Ring> {
        self.documents.get(&category).cloned().unwrap_or_default()
    }

    fn write(&mut self, category: ZoneCategory, rings: &[Ring]) -> Result<()> {
        self.documents.insert(category, rings.to_vec());
        Ok(())
    }
}

/// Reads a zone document directly from a path, outside any store.
#[must_use]
pub fn read_document(path: &Path) -> ZoneDocument {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}
