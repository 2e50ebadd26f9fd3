//! One-time load of the reference parcel polygons from a GeoJSON-like
//! cadastral source.
//!
//! The catalog is computed lazily on first access and cached for the
//! process lifetime. The environment is single-threaded, so the cache is
//! a compute-or-return-cached [`OnceCell`], not a lock. A read or parse
//! failure is fatal to the load and caches nothing.

use std::cell::OnceCell;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CadastreError, Result};
use crate::geom::{GeoPoint, Ring};

/// GeoJSON-like feature collection, the cadastral source contract.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    pub geometry: Geometry,
}

/// Geometry of one feature. Coordinates are `[longitude, latitude]`
/// pairs, GeoJSON order.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

impl Geometry {
    /// All rings of the geometry as `(part_index, ring_index, coords)`.
    /// A plain polygon counts as part 0.
    fn rings(&self) -> Vec<(usize, usize, &Vec<[f64; 2]>)> {
        match self {
            Self::Polygon(rings) => rings.iter().enumerate().map(|(r, c)| (0, r, c)).collect(),
            Self::MultiPolygon(parts) => parts
                .iter()
                .enumerate()
                .flat_map(|(m, rings)| rings.iter().enumerate().map(move |(r, c)| (m, r, c)))
                .collect(),
        }
    }

    /// Outer ring for a polygon; for a multi-polygon, the sub-polygon with
    /// the largest point count across all parts (a proxy for largest area,
    /// not true geometric area). First wins on ties.
    fn representative_ring(&self) -> Option<Ring> {
        match self {
            Self::Polygon(rings) => rings.first().map(|c| to_ring(c)),
            Self::MultiPolygon(_) => {
                let mut best: Option<&Vec<[f64; 2]>> = None;
                for (_, _, coords) in self.rings() {
                    if best.is_none_or(|b| coords.len() > b.len()) {
                        best = Some(coords);
                    }
                }
                best.map(|c| to_ring(c))
            }
        }
    }
}

/// An immutable reference polygon with its stable cadastral identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelRecord {
    pub parcel_id: String,
    pub ring: Ring,
}

/// How identifier collisions in the source are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Every sub-polygon becomes its own record; ids other than a
    /// feature's first sub-polygon get a `_<part>_<ring>` suffix.
    KeepAll,
    /// Strip any trailing `_<digits>_<digits>` suffix to get a base id and
    /// keep only the first-seen feature per base id, represented by its
    /// largest sub-polygon. The exposed id stays unstripped. Later
    /// features with the same base id are dropped without comparing
    /// geometry.
    KeepLargestPerBaseId,
}

enum Source {
    Path(PathBuf),
    Parsed(FeatureCollection),
}

/// Owns the parcel records for the process lifetime.
pub struct ParcelCatalog {
    source: Source,
    policy: DedupPolicy,
    cache: OnceCell<Vec<ParcelRecord>>,
}

impl ParcelCatalog {
    /// Catalog backed by a JSON file, read on first [`load`](Self::load).
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>, policy: DedupPolicy) -> Self {
        Self {
            source: Source::Path(path.into()),
            policy,
            cache: OnceCell::new(),
        }
    }

    /// Catalog over an already-parsed collection (embedded datasets,
    /// tests).
    #[must_use]
    pub fn from_collection(collection: FeatureCollection, policy: DedupPolicy) -> Self {
        Self {
            source: Source::Parsed(collection),
            policy,
            cache: OnceCell::new(),
        }
    }

    /// Loads the parcel records, computing them on the first call and
    /// returning the cached slice afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CadastreError`] if the source cannot be read or parsed.
    /// Nothing is cached on failure, so a later call retries the load.
    pub fn load(&self) -> Result<&[ParcelRecord]> {
        if let Some(records) = self.cache.get() {
            return Ok(records);
        }

        let records = match &self.source {
            Source::Path(path) => {
                let content = fs::read_to_string(path).map_err(|source| CadastreError::Read {
                    path: path.clone(),
                    source,
                })?;
                let collection: FeatureCollection =
                    serde_json::from_str(&content).map_err(CadastreError::Parse)?;
                build_records(&collection, self.policy)
            }
            Source::Parsed(collection) => build_records(collection, self.policy),
        };

        info!(records = records.len(), "cadastre processed and cached");
        Ok(self.cache.get_or_init(|| records))
    }
}

fn build_records(collection: &FeatureCollection, policy: DedupPolicy) -> Vec<ParcelRecord> {
    let mut records = Vec::new();
    let mut seen_bases: Vec<String> = Vec::new();

    for (index, feature) in collection.features.iter().enumerate() {
        let full_id = feature
            .id
            .clone()
            .unwrap_or_else(|| format!("parcelle_{index}"));

        match policy {
            DedupPolicy::KeepAll => {
                for (part, ring_index, coords) in feature.geometry.rings() {
                    let parcel_id = if part == 0 && ring_index == 0 {
                        full_id.clone()
                    } else {
                        format!("{full_id}_{part}_{ring_index}")
                    };
                    records.push(ParcelRecord {
                        parcel_id,
                        ring: to_ring(coords),
                    });
                }
            }
            DedupPolicy::KeepLargestPerBaseId => {
                let base = base_parcel_id(&full_id);
                if seen_bases.iter().any(|b| b == base) {
                    debug!(id = %full_id, base, "duplicate parcel dropped");
                    continue;
                }
                let Some(ring) = feature.geometry.representative_ring() else {
                    debug!(id = %full_id, "feature without rings skipped");
                    continue;
                };
                seen_bases.push(base.to_owned());
                records.push(ParcelRecord {
                    parcel_id: full_id,
                    ring,
                });
            }
        }
    }

    records
}

fn to_ring(coords: &[[f64; 2]]) -> Ring {
    coords
        .iter()
        .map(|&[lng, lat]| GeoPoint::new(lat, lng))
        .collect()
}

/// Strips one trailing `_<digits>_<digits>` suffix, if present.
fn base_parcel_id(id: &str) -> &str {
    let Some((head, last)) = id.rsplit_once('_') else {
        return id;
    };
    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return id;
    }
    let Some((base, mid)) = head.rsplit_once('_') else {
        return id;
    };
    if mid.is_empty() || !mid.bytes().all(|b| b.is_ascii_digit()) {
        return id;
    }
    base
}
